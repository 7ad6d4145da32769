//! Engine configuration
//!
//! All fields have defaults, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! { "max_completions": 20, "sla_budget_ms": 30 }
//! ```

use crate::completion::ranking::{DEFAULT_MAX_COMPLETIONS, DEFAULT_MIN_SCORE, RankingCriteria};
use crate::completion::sla::DEFAULT_SLA_BUDGET;
use crate::completion::usage::DEFAULT_USAGE_CAPACITY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Names seeded into a new session's usage tracker
pub const DEFAULT_SEED_NAMES: &[&str] = &[
    "console", "log", "function", "const", "let", "return", "import", "export", "async",
    "await", "self", "this",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_completions must be at least 1")]
    ZeroMaxCompletions,

    #[error("min_score must be within [0, 1], got {0}")]
    MinScoreOutOfRange(f64),

    #[error("usage_capacity must be at least 1")]
    ZeroUsageCapacity,

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum completions returned per request
    pub max_completions: usize,
    /// Candidates scoring below this are never shown
    pub min_score: f64,
    /// Soft latency budget in milliseconds
    pub sla_budget_ms: u64,
    /// Maximum names with a tracked usage frequency
    pub usage_capacity: usize,
    /// Names marked as used when the engine is created
    pub seed_names: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_completions: DEFAULT_MAX_COMPLETIONS,
            min_score: DEFAULT_MIN_SCORE,
            sla_budget_ms: DEFAULT_SLA_BUDGET.as_millis() as u64,
            usage_capacity: DEFAULT_USAGE_CAPACITY,
            seed_names: DEFAULT_SEED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_completions == 0 {
            return Err(ConfigError::ZeroMaxCompletions);
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ConfigError::MinScoreOutOfRange(self.min_score));
        }
        if self.usage_capacity == 0 {
            return Err(ConfigError::ZeroUsageCapacity);
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    pub fn sla_budget(&self) -> Duration {
        Duration::from_millis(self.sla_budget_ms)
    }

    pub fn ranking_criteria(&self) -> RankingCriteria {
        RankingCriteria {
            min_score: self.min_score,
            max_results: self.max_completions,
        }
    }
}
