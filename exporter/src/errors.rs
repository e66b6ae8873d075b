use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ExporterError {
    #[error("failure to deliver batch - `{0}`")]
    DeliveryFailure(String),

    #[error("delivery timed out")]
    DeliveryTimeout,

    #[error("previous delivery for this sink still in flight")]
    ConcurrencyLimitExceeded,

    #[error("pipeline already started")]
    AlreadyStarted,

    #[error("invalid sink endpoint - `{0}`")]
    InvalidEndpoint(String),
}
