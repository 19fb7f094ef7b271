//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to its defaults. LLM API keys come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use larder::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("larder.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use crate::application::config::{InferenceConfig, PlannerConfig};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite journal file. Defaults to "larder.db".
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Claim negotiation and shopping list settings.
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Availability inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// LLM provider configuration for inference.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            planner: PlannerConfig::default(),
            inference: InferenceConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "larder.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.planner.inference_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inference_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        unit_interval("pantry_default_likelihood", self.planner.pantry_default_likelihood)?;
        unit_interval("grocery_default_likelihood", self.planner.grocery_default_likelihood)?;
        unit_interval("min_confidence", self.inference.min_confidence)?;
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected \"pretty\" or \"json\", got \"{}\"", self.logging.format),
            }
            .into());
        }
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be between 0 and 1".to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::llm::LlmProvider;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.database, "larder.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.inference.enabled);
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
    }

    #[test]
    fn full_file_parses() {
        let config = Config::parse_toml(
            r#"
            database = "kitchen.db"

            [logging]
            level = "debug"
            format = "json"

            [planner]
            inference_timeout_ms = 500
            consult_definition_stores = false
            pantry_default_likelihood = 0.1
            grocery_default_likelihood = 0.9

            [inference]
            enabled = false
            min_confidence = 0.7

            [llm]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(config.database, "kitchen.db");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.planner.inference_timeout_ms, 500);
        assert!(!config.planner.consult_definition_stores);
        assert!(!config.inference.enabled);
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::parse_toml("[planner]\ninference_timeout_ms = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "inference_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn likelihood_out_of_range_is_rejected() {
        let err = Config::parse_toml("[planner]\npantry_default_likelihood = 1.5").unwrap_err();
        assert!(err.to_string().contains("pantry_default_likelihood"), "{err}");
    }

    #[test]
    fn min_confidence_out_of_range_is_rejected() {
        assert!(Config::parse_toml("[inference]\nmin_confidence = -0.1").is_err());
    }

    #[test]
    fn empty_database_is_rejected() {
        let err = Config::parse_toml("database = \"  \"").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "database" })
        ));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Config::parse_toml("[logging]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("database = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
