//! Environment-error taxonomy.
//!
//! Everything here is fatal: reported once, then the process exits with
//! status 1 before any model invocation. Heuristic-step failures are not
//! errors in this taxonomy; the pipeline logs them as warnings and keeps
//! going.

use camino::Utf8PathBuf;
use thiserror::Error;

/// A fatal problem with the run environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("inference binary not found: {0}")]
    BinaryMissing(Utf8PathBuf),

    #[error("inference binary is not executable: {0}")]
    BinaryNotExecutable(Utf8PathBuf),

    #[error("model file is not readable: {path}: {source}")]
    ModelUnreadable {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("cannot {action} {path}: {source}")]
    WorkingFile {
        /// What was being attempted ("create", "open", "write")
        action: &'static str,
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = EnvError::BinaryMissing(Utf8PathBuf::from("/opt/llm/main"));
        assert_eq!(err.to_string(), "inference binary not found: /opt/llm/main");

        let err = EnvError::WorkingFile {
            action: "create",
            path: Utf8PathBuf::from("/var/mem.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("cannot create /var/mem.txt"));
    }
}
