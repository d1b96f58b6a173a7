//! Environment validation.
//!
//! Runs before anything touches the model. Prompt and memory files are
//! auto-created when missing; everything else missing or inaccessible is
//! fatal.

use camino::Utf8Path;
use memloop_common::{EnvError, RunConfig, command_exists, is_executable};
use std::fs::{self, OpenOptions};

/// Check the whole run environment against `config`.
pub fn check_environment(config: &RunConfig) -> Result<(), EnvError> {
    ensure_working_file(&config.prompt_path)?;
    ensure_working_file(&config.memory_path)?;

    if let Some(parent) = config.log_path.parent() {
        fs::create_dir_all(parent).map_err(|source| EnvError::WorkingFile {
            action: "create",
            path: parent.to_owned(),
            source,
        })?;
    }

    check_binary(&config.binary_path)?;

    fs::File::open(&config.model_path).map_err(|source| EnvError::ModelUnreadable {
        path: config.model_path.clone(),
        source,
    })?;

    Ok(())
}

/// Create `path` empty if missing, then probe that it is readable and
/// writable.
fn ensure_working_file(path: &Utf8Path) -> Result<(), EnvError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| EnvError::WorkingFile {
                action: "create",
                path: parent.to_owned(),
                source,
            })?;
        }
        fs::write(path, "").map_err(|source| EnvError::WorkingFile {
            action: "create",
            path: path.to_owned(),
            source,
        })?;
    }

    OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(|source| EnvError::WorkingFile {
            action: "open",
            path: path.to_owned(),
            source,
        })?;

    Ok(())
}

/// A bare name must resolve through PATH; a path must exist with an execute
/// bit.
fn check_binary(binary: &Utf8Path) -> Result<(), EnvError> {
    if binary.as_str().contains('/') {
        if !binary.exists() {
            return Err(EnvError::BinaryMissing(binary.to_owned()));
        }
        if !is_executable(binary) {
            return Err(EnvError::BinaryNotExecutable(binary.to_owned()));
        }
        return Ok(());
    }

    if !command_exists(binary.as_str()) {
        return Err(EnvError::BinaryMissing(binary.to_owned()));
    }
    Ok(())
}
