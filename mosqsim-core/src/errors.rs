use thiserror::Error;

use crate::ode::Time;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum MosqsimError {
    #[error("{0}")]
    Error(String),
    #[error("Integration aborted at t={time}: {reason}")]
    IntegrationFailure { time: Time, reason: String },
    #[error("Integration over t={from}..{to} used {taken} internal steps, exceeding the budget of {budget}")]
    MaxStepsExceeded {
        from: Time,
        to: Time,
        taken: usize,
        budget: usize,
    },
    #[error("Expected a state vector of length {expected}, got {actual}")]
    StateSizeMismatch { expected: usize, actual: usize },
    #[error("Invalid parameter file: {0}")]
    InvalidParameterFile(String),
}

/// Convenience type for `Result<T, MosqsimError>`.
pub type MosqsimResult<T> = Result<T, MosqsimError>;
