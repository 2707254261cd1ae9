// Domain Layer - Pure payload model and time conversions

pub mod error;
pub mod time_payload;
pub mod utc_format;
pub mod zone;

// Re-exports
pub use error::DomainError;
pub use time_payload::{TimePayload, NAMESPACE};
pub use utc_format::{format_display, format_utc, parse_utc};
pub use zone::Zone;
