use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigsError {
    #[error("internal error")]
    InternalError,

    #[error("malformed collector endpoint - `{0}`")]
    InvalidEndpoint(String),
}
