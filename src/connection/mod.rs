//! Connection layer: parameters and the public connection API.

pub mod params;
pub mod session;

// Re-export commonly used types
pub use params::{ConnectionParams, ConnectionParamsBuilder};
pub use session::Connection;
