//! HTTP control plane for connection setup and async query jobs.
//!
//! The job lifecycle is written against the [`ControlPlane`] trait;
//! [`RestClient`] is the bundled HTTP implementation.

pub mod client;
pub mod protocol;

// Re-export commonly used types
pub use client::RestClient;
pub use protocol::{ControlPlane, JobResultRows, JobStatusReport};
