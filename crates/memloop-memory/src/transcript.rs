//! Line-oriented transcript files.
//!
//! The memory file, the backup and the base prompt are all plain text whose
//! unit of retention is the line. `Transcript` wraps one such path; a missing
//! file reads as empty.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, OpenOptions};
use std::io::Write;

/// A plain-text file handled line by line.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: Utf8PathBuf,
}

impl Transcript {
    /// Wrap a transcript path.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Create the file (and its directory) if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent))?;
        }
        fs::write(&self.path, "")
            .with_context(|| format!("failed to create transcript: {}", self.path))?;
        Ok(())
    }

    /// All lines of the file. A missing file reads as no lines.
    pub fn lines(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read transcript: {}", self.path))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Replace the file's content with `lines`, one per line.
    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write transcript: {}", self.path))?;
        Ok(())
    }

    /// Append one line.
    pub fn append_line(&self, line: &str) -> Result<()> {
        self.append_lines(&[line.to_string()])
    }

    /// Append several lines.
    pub fn append_lines(&self, lines: &[String]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open transcript: {}", self.path))?;
        for line in lines {
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    /// Append the labeled turn lines for this run.
    pub fn append_turn(&self, user: &str, assistant: &str) -> Result<()> {
        self.append_lines(&[format!("User: {}", user), format!("Assistant: {}", assistant)])
    }

    pub fn line_count(&self) -> Result<usize> {
        Ok(self.lines()?.len())
    }

    pub fn last_line(&self) -> Result<Option<String>> {
        Ok(self.lines()?.pop())
    }

    pub fn second_to_last_line(&self) -> Result<Option<String>> {
        let lines = self.lines()?;
        if lines.len() < 2 {
            return Ok(None);
        }
        Ok(Some(lines[lines.len() - 2].clone()))
    }

    /// Copy this transcript to `dest`.
    pub fn copy_to(&self, dest: &Utf8Path) -> Result<()> {
        fs::copy(&self.path, dest)
            .with_context(|| format!("failed to copy {} to {}", self.path, dest))?;
        Ok(())
    }
}
