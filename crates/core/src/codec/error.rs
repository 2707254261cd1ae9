// Codec Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Unexpected root element: expected <query xmlns=\"{expected}\">, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("No <query> element found")]
    MissingQuery,
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl From<quick_xml::Error> for CodecError {
    fn from(e: quick_xml::Error) -> Self {
        CodecError::Malformed(e.to_string())
    }
}
