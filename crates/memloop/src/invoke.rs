//! Model invocation.
//!
//! Runs the inference binary once against the assembled prompt, with the
//! fixed sampling parameters from the config. Output is captured in one
//! buffer (stderr merged into stdout), then written out in sequence: full
//! transcript to the log file, the trailing lines into the memory file, and
//! the capture back to the caller for the turn update.

use anyhow::{Result, bail};
use camino::Utf8Path;
use memloop_common::{RunConfig, RunLogger, run_captured};
use memloop_memory::Transcript;

/// Number of trailing output lines folded directly into memory.
const MEMORY_TAIL_LINES: usize = 50;

/// Argument list for the inference binary.
pub fn model_args(config: &RunConfig, prompt_file: &Utf8Path) -> Vec<String> {
    let sampling = &config.sampling;
    vec![
        "-m".to_string(),
        config.model_path.to_string(),
        "-f".to_string(),
        prompt_file.to_string(),
        "-c".to_string(),
        config.context_tokens.to_string(),
        "-n".to_string(),
        sampling.max_tokens.to_string(),
        "--temp".to_string(),
        sampling.temperature.to_string(),
        "--top-k".to_string(),
        sampling.top_k.to_string(),
        "--top-p".to_string(),
        sampling.top_p.to_string(),
        "--repeat-penalty".to_string(),
        sampling.repeat_penalty.to_string(),
    ]
}

/// Invoke the model and return the captured session output.
///
/// The tail of the raw output lands in the memory file before the labeled
/// turn lines are appended later, so model stream lines and transcript lines
/// coexist there. A non-zero exit from the binary is fatal, but the log and
/// the memory tail keep whatever was produced up to that point.
pub fn run_model(
    config: &RunConfig,
    prompt_file: &Utf8Path,
    memory: &Transcript,
    logger: &RunLogger,
) -> Result<String> {
    logger.info(&format!(
        "invoking {} (ctx {} tokens)",
        config.binary_path, config.context_tokens
    ));

    let result = run_captured(&config.binary_path, &model_args(config, prompt_file))?;
    logger.append_transcript(&result.output);

    let lines: Vec<&str> = result.output.lines().collect();
    let start = lines.len().saturating_sub(MEMORY_TAIL_LINES);
    let tail: Vec<String> = lines[start..].iter().map(|s| s.to_string()).collect();
    memory.append_lines(&tail)?;

    if !result.success {
        bail!(
            "inference binary exited with status {}",
            result
                .exit_code
                .map_or_else(|| "signal".to_string(), |code| code.to_string())
        );
    }

    Ok(result.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[cfg(unix)]
    fn write_executable(path: &std::path::Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, script).unwrap();
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn test_model_args_carry_sampling_params() {
        let config = RunConfig::default();
        let args = model_args(&config, Utf8Path::new("/tmp/prompt.assembled"));

        assert_eq!(args[0], "-m");
        assert_eq!(args[3], "/tmp/prompt.assembled");
        let joined = args.join(" ");
        assert!(joined.contains("-c 4096"));
        assert!(joined.contains("-n 256"));
        assert!(joined.contains("--temp 0.7"));
        assert!(joined.contains("--top-k 40"));
        assert!(joined.contains("--top-p 0.9"));
        assert!(joined.contains("--repeat-penalty 1.1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_model_captures_and_tails_into_memory() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path().to_path_buf());
        let config = RunConfig {
            binary_path: root.join("fake-model"),
            model_path: root.join("model.gguf"),
            log_path: root.join("run.log"),
            ..RunConfig::default()
        };
        write_executable(
            config.binary_path.as_std_path(),
            "#!/bin/sh\necho loading\necho reply line 1>&2\n",
        );

        let memory = Transcript::new(root.join("memory.txt"));
        let logger = RunLogger::new(config.log_path.clone());
        let output =
            run_model(&config, &root.join("prompt.assembled"), &memory, &logger).unwrap();

        assert!(output.contains("loading"));
        assert!(output.contains("reply line"));
        // Raw stream lines are already in memory, stderr included
        assert_eq!(memory.lines().unwrap(), vec!["loading", "reply line"]);
        // And the full transcript is in the log
        let log = std::fs::read_to_string(&config.log_path).unwrap();
        assert!(log.contains("loading"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_model_nonzero_exit_is_fatal_but_keeps_output() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path().to_path_buf());
        let config = RunConfig {
            binary_path: root.join("fake-model"),
            log_path: root.join("run.log"),
            ..RunConfig::default()
        };
        write_executable(
            config.binary_path.as_std_path(),
            "#!/bin/sh\necho partial\nexit 7\n",
        );

        let memory = Transcript::new(root.join("memory.txt"));
        let logger = RunLogger::new(config.log_path.clone());
        let err = run_model(&config, &root.join("p"), &memory, &logger).unwrap_err();

        assert!(err.to_string().contains("status 7"));
        assert_eq!(memory.lines().unwrap(), vec!["partial"]);
    }
}
