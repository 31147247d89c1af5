use crate::constants::{
    CONFIG_ENV_VAR, DEFAULT_ACTIVE_DECISIONS, DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILTER,
};
use crate::error::{Result, TallyError};
use crate::extractors::UnknownCodePolicy;
use crate::filter::DecisionFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub recommendations: RecommendationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Decision codes marking a submission as still under review.
    pub active_decisions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            active_decisions: DEFAULT_ACTIVE_DECISIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub on_unknown: UnknownCodePolicy,
    /// Decision emitted as an empty cell; the common in-review state.
    pub blank_decision: Option<String>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            on_unknown: UnknownCodePolicy::Abort,
            blank_decision: Some("RER".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Directory for daily-rotated JSON logs; file logging is off when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Loads configuration from `explicit`, else `$REVIEW_TALLY_CONFIG`,
    /// else `review_tally.toml` when present, else defaults.
    /// A named file that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(path.trim()));
            }
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TallyError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.filter.active_decisions.iter().all(|d| d.trim().is_empty()) {
            return Err(TallyError::Config(
                "filter.active_decisions must name at least one decision".to_string(),
            ));
        }
        Ok(())
    }

    pub fn decision_filter(&self) -> DecisionFilter {
        DecisionFilter::new(self.filter.active_decisions.iter().cloned())
    }
}
