//! The pipeline driver.
//!
//! One run is strictly linear: validate, select fragments, assemble the
//! prompt, invoke the model, update memory, trim memory. Environment problems
//! abort before the model is touched; trim and backup failures only warn.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use memloop_common::{RunConfig, RunLogger};
use memloop_memory::{FragmentFiles, Fragments, Transcript, trimmer};
use std::fs;
use tempfile::TempDir;

use crate::{invoke, validate};

/// Execute one full run against `config`.
pub fn run(config: &RunConfig, logger: &RunLogger) -> Result<()> {
    logger.info(&format!("config: {}", config.summary_json()));

    validate::check_environment(config)?;
    logger.info("environment checks passed");

    // Scratch space for the fragments and the assembled prompt. The guard
    // removes it on every exit path, including errors below.
    let scratch = TempDir::new().context("failed to create scratch directory")?;
    let scratch_dir = Utf8Path::from_path(scratch.path())
        .context("scratch directory path is not valid UTF-8")?;

    let memory = Transcript::new(config.memory_path.clone());

    let fragments = Fragments::select(&config.memory_path, config.fragment_bytes)?;
    logger.info(&format!(
        "fragments selected: unique {} bytes, common {} bytes",
        fragments.unique.len(),
        fragments.common.len()
    ));
    let fragment_files = fragments.write_to(scratch_dir)?;

    let prompt_file = assemble_prompt(&config.prompt_path, &fragment_files, scratch_dir)?;

    let session = invoke::run_model(config, &prompt_file, &memory, logger)?;

    let user_line = Transcript::new(config.prompt_path.clone())
        .last_line()?
        .unwrap_or_default();
    let assistant_line = session.lines().last().unwrap_or("").to_string();
    memory.append_turn(&user_line, &assistant_line)?;

    if let Err(err) = memory.copy_to(&config.backup_path) {
        logger.warn(&format!("backup skipped: {:#}", err));
    }

    let logical_length = fragments.logical_length();
    let backup = Transcript::new(config.backup_path.clone());
    match trimmer::apply(&memory, &backup, logical_length) {
        Ok(report) => logger.info(&format!(
            "memory trimmed: {} -> {} lines (logical length {}{})",
            report.lines_before,
            report.lines_after,
            logical_length,
            if report.recovered {
                ", one line recovered from backup"
            } else {
                ""
            }
        )),
        Err(err) => logger.warn(&format!("trim pass skipped: {:#}", err)),
    }

    Ok(())
}

/// Concatenate base prompt, common fragment and unique fragment into one
/// ephemeral prompt file. Content is passed through untouched.
fn assemble_prompt(
    base: &Utf8Path,
    fragments: &FragmentFiles,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let path = dir.join("prompt.assembled");
    let mut content =
        fs::read(base).with_context(|| format!("failed to read base prompt: {}", base))?;
    content.extend(fs::read(&fragments.common_path)?);
    content.extend(fs::read(&fragments.unique_path)?);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_assemble_prompt_orders_base_common_unique() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let base = root.join("prompt.txt");
        fs::write(&base, "BASE\n").unwrap();
        let fragments = Fragments {
            unique: b"UNIQUE".to_vec(),
            common: b"COMMON".to_vec(),
        };
        let files = fragments.write_to(&root).unwrap();

        let assembled = assemble_prompt(&base, &files, &root).unwrap();
        let content = fs::read_to_string(&assembled).unwrap();
        assert_eq!(content, "BASE\nCOMMONUNIQUE");
    }

    #[test]
    fn test_assemble_prompt_missing_base_is_err() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let files = Fragments {
            unique: Vec::new(),
            common: Vec::new(),
        }
        .write_to(&root)
        .unwrap();

        let result = assemble_prompt(&root.join("absent.txt"), &files, &root);
        assert!(result.is_err());
    }
}
