//! Conversation memory for the memloop runner.
//!
//! Provides:
//! - The line-oriented transcript file type
//! - Positional fragment selection
//! - The three-stage trimming heuristic

pub mod fragments;
pub mod transcript;
pub mod trimmer;

pub use fragments::{FragmentFiles, Fragments};
pub use transcript::Transcript;
pub use trimmer::TrimReport;
