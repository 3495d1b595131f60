use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Index {index} out of range for mission of {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Navigation fault at waypoint {index}: {reason}")]
    NavigationFault { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ExecutionResult<T> = Result<T, ExecutionError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
