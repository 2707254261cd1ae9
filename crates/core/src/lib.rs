// Entity Time Core - Payload, Time Conversions & Ports
// NO transport dependencies: stanza envelopes and routing live outside this crate

pub mod application;
pub mod codec;
pub mod domain;
pub mod error;
pub mod port;

pub use domain::{TimePayload, Zone, NAMESPACE};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
