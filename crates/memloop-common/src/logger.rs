//! Console + log-file logging.
//!
//! Informational lines go to stdout and the log file with an
//! `[INFO][timestamp]` prefix; errors go to stderr and the log file with an
//! `[ERROR]` prefix. Log-file writes are best-effort: a broken log path must
//! never take the run down.

use camino::Utf8PathBuf;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;

/// Logger for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunLogger {
    log_path: Utf8PathBuf,
}

impl RunLogger {
    /// Create a logger appending to `log_path`, creating its directory if needed.
    pub fn new(log_path: impl Into<Utf8PathBuf>) -> Self {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Self { log_path }
    }

    /// Informational progress, to stdout and the log file.
    pub fn info(&self, message: &str) {
        let line = format!("[INFO][{}] {}", timestamp(), message);
        println!("{}", line);
        self.append(&line);
    }

    /// Suppressed step failure, to stderr and the log file. Never fatal.
    pub fn warn(&self, message: &str) {
        let line = format!("[WARN] {}", message);
        eprintln!("{}", line);
        self.append(&line);
    }

    /// Fatal error, to stderr and the log file.
    pub fn error(&self, message: &str) {
        let line = format!("[ERROR] {}", message);
        eprintln!("{}", line);
        self.append(&line);
    }

    /// Append raw text (the model's transcript) to the log file only.
    pub fn append_transcript(&self, text: &str) {
        self.append(text.trim_end_matches('\n'));
    }

    fn append(&self, line: &str) {
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| writeln!(file, "{}", line));
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
