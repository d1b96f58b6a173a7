//! Common utilities for the memloop runner.
//!
//! This crate provides the pieces every stage of the pipeline shares:
//! - Run configuration with environment overrides
//! - Console + log-file logging
//! - The environment-error taxonomy
//! - Subprocess execution

pub mod config;
pub mod error;
pub mod logger;
pub mod subprocess;

pub use config::{RunConfig, SamplingParams};
pub use error::EnvError;
pub use logger::RunLogger;
pub use subprocess::{CommandResult, command_exists, is_executable, run_captured};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{RunConfig, SamplingParams};
    pub use crate::error::EnvError;
    pub use crate::logger::RunLogger;
    pub use crate::subprocess::{CommandResult, run_captured};
    pub use anyhow::{Context, Result};
    pub use camino::{Utf8Path, Utf8PathBuf};
}
