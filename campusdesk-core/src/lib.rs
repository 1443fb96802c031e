//! CampusDesk Core - shared infrastructure for the dashboard client
//!
//! Error handling, logging and configuration used by the portal library
//! and the command-line front end.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
