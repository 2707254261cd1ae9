// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid time string '{input}': {source}")]
    InvalidTimeString {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown time zone: {0}")]
    UnknownZone(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
