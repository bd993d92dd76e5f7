use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid port number: {0}. Must be 1-10.")]
    InvalidPort(i64),

    #[error("Invalid serial device: {0}")]
    InvalidDevice(String),

    #[error("Invalid line configuration: {0}")]
    InvalidLineConfig(String),

    #[error("Port discovery failed: {0}")]
    Discovery(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
