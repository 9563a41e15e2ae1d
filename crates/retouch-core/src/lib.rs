//! Retouch Core Library
//!
//! Image codec, port traits and the edit workflow state machine.

// Re-export pure types from retouch-types
pub use retouch_types::*;

pub mod codec;
pub mod config;
pub mod error;
pub mod ports;
pub mod workflow;

pub use codec::ImageResource;
pub use config::ServiceConfig;
pub use error::{Result, RetouchError};
pub use ports::{EditBackend, SaveTarget};
pub use workflow::{EditWorkflow, Submission};
