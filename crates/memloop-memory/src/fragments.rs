//! Positional fragment selection.
//!
//! The memory file is split into fixed-size byte chunks; the first chunk is
//! the "unique" fragment and the last chunk is the "common" fragment. The
//! names are historical: no similarity is computed, the selection is purely
//! positional, and changing that would change observable prompts.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// The two fragments selected from the memory file for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    /// First chunk of the memory file
    pub unique: Vec<u8>,
    /// Last chunk, empty when the file fits in a single chunk
    pub common: Vec<u8>,
}

/// On-disk locations of the fragments inside the run's scratch directory.
#[derive(Debug, Clone)]
pub struct FragmentFiles {
    pub unique_path: Utf8PathBuf,
    pub common_path: Utf8PathBuf,
}

impl Fragments {
    /// Select fragments from the file at `path`.
    ///
    /// Empty file: both fragments empty. At most one chunk: the whole file is
    /// the unique fragment and the common fragment stays empty, so the same
    /// bytes never land in both.
    pub fn select(path: &Utf8Path, chunk_bytes: usize) -> Result<Self> {
        let bytes = if path.exists() {
            fs::read(path).with_context(|| format!("failed to read {}", path))?
        } else {
            Vec::new()
        };
        Ok(Self::from_bytes(&bytes, chunk_bytes))
    }

    /// Split `bytes` into `chunk_bytes`-sized chunks and keep the ends.
    pub fn from_bytes(bytes: &[u8], chunk_bytes: usize) -> Self {
        let chunk = chunk_bytes.max(1);
        if bytes.is_empty() {
            return Self {
                unique: Vec::new(),
                common: Vec::new(),
            };
        }
        if bytes.len() <= chunk {
            return Self {
                unique: bytes.to_vec(),
                common: Vec::new(),
            };
        }
        let last_start = (bytes.len() - 1) / chunk * chunk;
        Self {
            unique: bytes[..chunk].to_vec(),
            common: bytes[last_start..].to_vec(),
        }
    }

    /// Proxy for how much novel context this turn folds in: 2 for the two
    /// turn lines, +1 per non-empty fragment. Always in 2..=4.
    pub fn logical_length(&self) -> usize {
        let mut length = 2;
        if !self.unique.is_empty() {
            length += 1;
        }
        if !self.common.is_empty() {
            length += 1;
        }
        length
    }

    /// Write both fragments into `dir` as `fragment.unique` / `fragment.common`.
    pub fn write_to(&self, dir: &Utf8Path) -> Result<FragmentFiles> {
        let unique_path = dir.join("fragment.unique");
        let common_path = dir.join("fragment.common");
        fs::write(&unique_path, &self.unique)
            .with_context(|| format!("failed to write {}", unique_path))?;
        fs::write(&common_path, &self.common)
            .with_context(|| format!("failed to write {}", common_path))?;
        Ok(FragmentFiles {
            unique_path,
            common_path,
        })
    }
}
