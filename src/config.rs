//! Application configuration loaded from an optional YAML file

use crate::error::{ExamError, ExamResult};
use crate::store::sqlite::MAX_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_database() -> PathBuf {
    PathBuf::from("examtrack.db")
}

fn default_top_n() -> usize {
    40
}

fn default_movers_limit() -> usize {
    10
}

fn default_insert_chunk_size() -> usize {
    300
}

fn default_cache_ttl_secs() -> u64 {
    30
}

/// Runtime settings shared by the CLI and the API server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Ranked list length
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Risers/fallers shown per side
    #[serde(default = "default_movers_limit")]
    pub movers_limit: usize,

    /// Rows per multi-row INSERT statement
    #[serde(default = "default_insert_chunk_size")]
    pub insert_chunk_size: usize,

    /// Corpus cache lifetime; 0 disables caching
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            top_n: default_top_n(),
            movers_limit: default_movers_limit(),
            insert_chunk_size: default_insert_chunk_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or return defaults when no file is given
    pub fn load(path: Option<&Path>) -> ExamResult<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> ExamResult<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExamResult<()> {
        if self.top_n == 0 {
            return Err(ExamError::Validation("top_n must be at least 1".to_string()));
        }
        if self.movers_limit == 0 {
            return Err(ExamError::Validation(
                "movers_limit must be at least 1".to_string(),
            ));
        }
        if self.insert_chunk_size == 0 {
            return Err(ExamError::Validation(
                "insert_chunk_size must be at least 1".to_string(),
            ));
        }
        if self.insert_chunk_size > MAX_CHUNK_SIZE {
            return Err(ExamError::Validation(format!(
                "insert_chunk_size must be at most {MAX_CHUNK_SIZE}"
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
