// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Codec error: {0}")]
    Codec(#[from] crate::codec::CodecError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
