/// Configuration module for kbqa.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::kb::renumber::DEFAULT_ID_PREFIX;
use crate::tokenizer::Tokenizer;
use crate::tokenizer::jieba::JiebaTokenizer;

// ── Default value functions ──────────────────────────────────────────

fn default_knowledge_file() -> String {
    "knowledge_base.json".to_string()
}

fn default_answer_top_n() -> usize {
    3
}

fn default_search_top_n() -> usize {
    5
}

fn default_snippet_chars() -> usize {
    100
}

fn default_renumber_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_knowledge_file")]
    pub knowledge_file: String,

    /// Retrieval depth used when answering.
    #[serde(default = "default_answer_top_n")]
    pub answer_top_n: usize,

    /// Number of results returned by a plain search.
    #[serde(default = "default_search_top_n")]
    pub search_top_n: usize,

    /// Evidence preview length (in characters) for listings.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    #[serde(default = "default_renumber_prefix")]
    pub renumber_prefix: String,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenizerConfig {
    /// Use the HMM to discover words missing from the dictionary.
    #[serde(default = "default_true")]
    pub hmm: bool,

    /// Extra dictionary file, one `word [freq] [tag]` entry per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_dict: Option<String>,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_file: default_knowledge_file(),
            answer_top_n: default_answer_top_n(),
            search_top_n: default_search_top_n(),
            snippet_chars: default_snippet_chars(),
            renumber_prefix: default_renumber_prefix(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            hmm: default_true(),
            user_dict: None,
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and optionally
    /// generates a template file.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            // Generate template only for the default path
            if path == "config.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.answer_top_n > 0, "answer_top_n must be positive");
        anyhow::ensure!(self.search_top_n > 0, "search_top_n must be positive");
        anyhow::ensure!(self.snippet_chars > 0, "snippet_chars must be positive");
        anyhow::ensure!(
            !self.knowledge_file.trim().is_empty(),
            "knowledge_file must be specified"
        );
        Ok(())
    }

    #[must_use]
    pub fn knowledge_path(&self) -> PathBuf {
        PathBuf::from(&self.knowledge_file)
    }

    /// Build the configured segmentation tokenizer.
    pub fn build_tokenizer(&self) -> Result<Arc<dyn Tokenizer>> {
        let mut tokenizer = JiebaTokenizer::new().with_hmm(self.tokenizer.hmm);
        if let Some(dict) = &self.tokenizer.user_dict {
            tokenizer = tokenizer
                .with_user_dict(Path::new(dict))
                .context("failed to load user dictionary")?;
        }
        Ok(Arc::new(tokenizer))
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.knowledge_file, "knowledge_base.json");
        assert_eq!(config.answer_top_n, 3);
        assert_eq!(config.search_top_n, 5);
        assert_eq!(config.snippet_chars, 100);
        assert_eq!(config.renumber_prefix, "Q_HEALTH_");
        assert!(config.tokenizer.hmm);
        assert!(config.tokenizer.user_dict.is_none());
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"search_top_n": 10, "knowledge_file": "./kb.json"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.search_top_n, 10);
        assert_eq!(config.knowledge_file, "./kb.json");
        // Other fields should have defaults
        assert_eq!(config.answer_top_n, 3);
        assert!(config.tokenizer.hmm);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"tokenizer": {"hmm": false}}"#).unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert!(!config.tokenizer.hmm);
        assert_eq!(config.search_top_n, 5);
    }

    #[test]
    fn test_load_missing_non_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.answer_top_n, 3);
        // Templates are only generated for the default path.
        assert!(!path.exists());
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.search_top_n, 5);
    }

    #[test]
    fn test_validate_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_top_n() {
        let mut config = Config::default();
        config.answer_top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_knowledge_file() {
        let mut config = Config::default();
        config.knowledge_file = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_tokenizer_missing_user_dict() {
        let mut config = Config::default();
        config.tokenizer.user_dict = Some("/nonexistent/user_dict.txt".to_string());
        assert!(config.build_tokenizer().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.knowledge_file, config.knowledge_file);
        assert_eq!(parsed.search_top_n, config.search_top_n);
        assert_eq!(parsed.tokenizer.hmm, config.tokenizer.hmm);
    }
}
