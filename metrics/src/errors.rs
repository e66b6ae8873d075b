use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum MetricsError {
    #[error("instrument `{0}` already registered with a different kind")]
    ConflictingInstrumentKind(String),

    #[error("counter increments must be non-negative")]
    InvalidDelta,
}
