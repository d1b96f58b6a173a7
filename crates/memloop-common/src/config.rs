//! Run configuration.
//!
//! Every path and parameter the pipeline touches lives in one struct that is
//! built once in `main` and passed down. Defaults are compiled in; each field
//! can be overridden through a `MEMLOOP_*` environment variable. There are no
//! command-line flags.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Sampling parameters passed to the inference binary on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    /// Maximum number of new tokens to generate
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.9,
            repeat_penalty: 1.1,
            max_tokens: 256,
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Inference binary (bare name resolves through PATH)
    pub binary_path: Utf8PathBuf,
    /// Model weights file
    pub model_path: Utf8PathBuf,
    /// Base prompt file; its last line is the user's most recent input
    pub prompt_path: Utf8PathBuf,
    /// Conversation memory file, mutated in place after every run
    pub memory_path: Utf8PathBuf,
    /// Snapshot of the memory file taken before trimming
    pub backup_path: Utf8PathBuf,
    /// Append-only run log
    pub log_path: Utf8PathBuf,
    /// Context window handed to the inference binary, in tokens
    pub context_tokens: u32,
    /// Size of a memory fragment, in bytes
    pub fragment_bytes: usize,
    pub sampling: SamplingParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        let root = default_root();
        Self {
            binary_path: Utf8PathBuf::from("llama-cli"),
            model_path: root.join("model.gguf"),
            prompt_path: root.join("prompt.txt"),
            memory_path: root.join("memory.txt"),
            backup_path: root.join("memory.bak"),
            log_path: root.join("memloop.log"),
            context_tokens: 4096,
            fragment_bytes: 800,
            sampling: SamplingParams::default(),
        }
    }
}

impl RunConfig {
    /// Build the config from defaults plus `MEMLOOP_*` environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from defaults plus overrides supplied by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(v) = lookup("MEMLOOP_BINARY") {
            config.binary_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_MODEL") {
            config.model_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_PROMPT") {
            config.prompt_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_MEMORY") {
            config.memory_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_BACKUP") {
            config.backup_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_LOG") {
            config.log_path = Utf8PathBuf::from(v);
        }
        if let Some(v) = lookup("MEMLOOP_CONTEXT_TOKENS") {
            if let Ok(n) = v.parse() {
                config.context_tokens = n;
            }
        }
        if let Some(v) = lookup("MEMLOOP_FRAGMENT_BYTES") {
            if let Ok(n) = v.parse() {
                config.fragment_bytes = n;
            }
        }
        config
    }

    /// One-line JSON rendering of the effective config, for the run log.
    pub fn summary_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Default working directory for memloop files.
///
/// Priority:
/// 1. MEMLOOP_HOME environment variable (if set)
/// 2. <user data dir>/memloop (e.g. ~/.local/share/memloop)
pub fn default_root() -> Utf8PathBuf {
    if let Ok(custom) = std::env::var("MEMLOOP_HOME") {
        return Utf8PathBuf::from(custom);
    }

    if let Some(data) = dirs::data_dir().and_then(|p| Utf8PathBuf::from_path_buf(p).ok()) {
        data.join("memloop")
    } else {
        Utf8PathBuf::from(".memloop")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.context_tokens, 4096);
        assert_eq!(config.fragment_bytes, 800);
        assert_eq!(config.binary_path, Utf8PathBuf::from("llama-cli"));
        assert!(config.memory_path.as_str().ends_with("memory.txt"));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = RunConfig::from_lookup(|key| match key {
            "MEMLOOP_BINARY" => Some("/opt/llm/main".to_string()),
            "MEMLOOP_MEMORY" => Some("/tmp/mem.txt".to_string()),
            "MEMLOOP_FRAGMENT_BYTES" => Some("400".to_string()),
            _ => None,
        });
        assert_eq!(config.binary_path, Utf8PathBuf::from("/opt/llm/main"));
        assert_eq!(config.memory_path, Utf8PathBuf::from("/tmp/mem.txt"));
        assert_eq!(config.fragment_bytes, 400);
        // Untouched fields keep their defaults
        assert_eq!(config.context_tokens, 4096);
    }

    #[test]
    fn test_bad_numeric_override_is_ignored() {
        let config = RunConfig::from_lookup(|key| match key {
            "MEMLOOP_CONTEXT_TOKENS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(config.context_tokens, 4096);
    }

    #[test]
    fn test_summary_json() {
        let json = RunConfig::default().summary_json();
        assert!(json.contains("\"context_tokens\":4096"));
        assert!(json.contains("\"fragment_bytes\":800"));
    }
}
