//! Handlers for `larder config` and config loading for every command.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::{diagnostic, output};
use crate::error::{ConfigError, Error};
use crate::infrastructure::config::settings::Config;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "larder.toml";

/// Load the config at `path`, or the default file if it exists, or built-in
/// defaults.
///
/// # Errors
///
/// Returns a diagnostic pointing into the file when it cannot be parsed or
/// fails validation.
pub fn load(path: Option<&Path>) -> miette::Result<(Config, Option<PathBuf>)> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok((Config::default(), None));
            }
            default
        }
    };

    let src = std::fs::read_to_string(&path)
        .map_err(|e| diagnostic::report(Error::Config(ConfigError::ReadFile(e))))?;
    let config = Config::parse_toml(&src)
        .map_err(|e| diagnostic::config_report(&path.display().to_string(), src, e))?;
    Ok((config, Some(path)))
}

/// Execute `config validate`.
pub fn validate(path: Option<&Path>) {
    let shown = path.map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
    if output::is_json() {
        output::json_output(json!({ "command": "config.validate", "path": shown, "status": "ok" }));
        return;
    }
    output::success(&format!("{shown} is valid"));
}

/// Execute `config show`.
pub fn show(config: &Config) {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "database": config.database,
            "logging": { "level": config.logging.level, "format": config.logging.format },
            "planner": {
                "inference_timeout_ms": config.planner.inference_timeout_ms,
                "consult_definition_stores": config.planner.consult_definition_stores,
                "pantry_default_likelihood": config.planner.pantry_default_likelihood,
                "grocery_default_likelihood": config.planner.grocery_default_likelihood,
            },
            "inference": {
                "enabled": config.inference.enabled,
                "min_confidence": config.inference.min_confidence,
            },
            "llm": { "provider": format!("{:?}", config.llm.provider).to_lowercase() },
        }));
        return;
    }

    output::section("Effective Configuration");
    output::field("Database", &config.database);
    output::field("Log level", &config.logging.level);

    output::section("Planner");
    output::field("Timeout", format!("{}ms", config.planner.inference_timeout_ms));
    output::field(
        "Consult",
        if config.planner.consult_definition_stores {
            "definition stores"
        } else {
            "catch-all only"
        },
    );
    output::field("Pantry buy", output::percent(config.planner.pantry_default_likelihood));
    output::field("Grocery buy", output::percent(config.planner.grocery_default_likelihood));

    output::section("Inference");
    output::field("Enabled", if config.inference.enabled { "yes" } else { "no" });
    if config.inference.enabled {
        output::field("Provider", format!("{:?}", config.llm.provider));
        output::field("Min conf.", output::percent(config.inference.min_confidence));
    }
}
