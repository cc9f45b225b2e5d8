use hearts_bot::registry::by_id;
use hearts_core::MatchSettings;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

use crate::deck::RetryPolicy;
use crate::scheduler::BatchLimit;

const DEFAULT_BATCH_LIMIT: u32 = 64;
const DEFAULT_DEAL_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 25;
const DEFAULT_MAX_BACKOFF_MS: u64 = 400;
const DEFAULT_STRATEGIES: [&str; 4] = ["cautious", "suit_avoidance", "void_shortest", "random"];

/// Root table configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub ai: AiConfig,
    pub dealing: DealingConfig,
    pub match_defaults: MatchDefaults,
    pub logging: LoggingConfig,
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.dealing.validate()?;
        self.match_defaults.validate()?;
        self.logging.normalize();
        Ok(())
    }

    pub fn batch_limit(&self) -> BatchLimit {
        if self.ai.unbounded {
            BatchLimit::Unbounded
        } else {
            BatchLimit::Turns(self.ai.batch_limit)
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.dealing.attempts,
            backoff: Duration::from_millis(self.dealing.backoff_ms),
            max_backoff: Duration::from_millis(self.dealing.max_backoff_ms),
        }
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            goal: self.match_defaults.goal,
            seed: self.dealing.seed,
        }
    }
}

/// Strategy line-up and scheduler limits.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// One strategy id per seat, North first.
    pub strategies: Vec<String>,
    pub batch_limit: u32,
    pub unbounded: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.iter().map(|id| id.to_string()).collect(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            unbounded: false,
        }
    }
}

impl AiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.strategies.len() != 4 {
            return Err(ValidationError::InvalidField {
                field: "ai.strategies".to_string(),
                message: format!("exactly 4 strategies are required, got {}", self.strategies.len()),
            });
        }
        for (index, id) in self.strategies.iter().enumerate() {
            if by_id(id).is_none() {
                return Err(ValidationError::InvalidField {
                    field: format!("ai.strategies[{index}]"),
                    message: format!("unknown strategy '{id}'"),
                });
            }
        }
        if !self.unbounded && self.batch_limit == 0 {
            return Err(ValidationError::InvalidField {
                field: "ai.batch_limit".to_string(),
                message: "batch limit must be greater than zero (or set ai.unbounded)".to_string(),
            });
        }
        Ok(())
    }
}

/// Deck acquisition: seed and retry schedule.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DealingConfig {
    pub seed: Option<u64>,
    pub attempts: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for DealingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            attempts: DEFAULT_DEAL_ATTEMPTS,
            backoff_ms: DEFAULT_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

impl DealingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.attempts == 0 {
            return Err(ValidationError::InvalidField {
                field: "dealing.attempts".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.backoff_ms > self.max_backoff_ms {
            return Err(ValidationError::InvalidField {
                field: "dealing.backoff_ms".to_string(),
                message: "initial backoff exceeds dealing.max_backoff_ms".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchDefaults {
    pub goal: u32,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            goal: MatchSettings::default().goal,
        }
    }
}

impl MatchDefaults {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.goal == 0 {
            return Err(ValidationError::InvalidField {
                field: "match_defaults.goal".to_string(),
                message: "score goal must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging defaults to human-readable output on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub tracing_level: String,
    /// When set, structured JSON events go to this file instead.
    pub json_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tracing_level: default_tracing_level(),
            json_path: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
ai:
  strategies: ["cautious", "moon_shooter", "leader_hunter", "leftmost"]
  batch_limit: 12
dealing:
  seed: 123
  attempts: 5
match_defaults:
  goal: 50
logging:
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: TableConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.ai.strategies[1], "moon_shooter");
        assert_eq!(cfg.batch_limit(), BatchLimit::Turns(12));
        assert_eq!(cfg.dealing.backoff_ms, DEFAULT_BACKOFF_MS);
        assert_eq!(cfg.retry_policy().attempts, 5);
        assert_eq!(
            cfg.match_settings(),
            MatchSettings {
                goal: 50,
                seed: Some(123)
            }
        );
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg: TableConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults validate");
        assert_eq!(cfg, TableConfig::default());
        assert_eq!(cfg.match_defaults.goal, 100);
        assert_eq!(cfg.batch_limit(), BatchLimit::Turns(DEFAULT_BATCH_LIMIT));
    }

    #[test]
    fn unbounded_overrides_batch_limit() {
        let yaml = BASIC_YAML.replace("batch_limit: 12", "batch_limit: 0\n  unbounded: true");
        let mut cfg: TableConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.batch_limit(), BatchLimit::Unbounded);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let yaml = BASIC_YAML.replace("\"leftmost\"", "\"grandmaster\"");
        let mut cfg: TableConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("unknown strategy");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "ai.strategies[3]"
        ));
    }

    #[test]
    fn rejects_wrong_seat_count() {
        let yaml = BASIC_YAML.replace(", \"leftmost\"", "");
        let mut cfg: TableConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("three strategies");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "ai.strategies"
        ));
    }

    #[test]
    fn rejects_zero_goal_and_attempts() {
        let yaml = BASIC_YAML.replace("goal: 50", "goal: 0");
        let mut cfg: TableConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert!(cfg.validate().is_err());

        let yaml = BASIC_YAML.replace("attempts: 5", "attempts: 0");
        let mut cfg: TableConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero attempts");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "dealing.attempts"
        ));
    }
}
