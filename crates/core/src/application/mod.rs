// Application Layer - Use Cases

pub mod entity_time;

// Re-exports
pub use entity_time::{EntityTimeService, RemoteTime};
