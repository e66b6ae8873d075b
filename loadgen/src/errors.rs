use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum LoadGenError {
    #[error("generator interval must be positive")]
    InvalidInterval,

    #[error("failure to register generator instruments - `{0}`")]
    InstrumentError(String),
}
