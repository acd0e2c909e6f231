use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "LABSCAN_CONFIG";

const MIN_DPI: u32 = 72;
const MAX_DPI: u32 = 1200;

/// Load a config file. Relative artifact paths resolve against the file's
/// directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = load_config_from_str(&content)?;
    if let Some(base) = path.parent() {
        config.artifacts = config.artifacts.resolve_against(base);
    }

    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Find and load the config: explicit path, then `LABSCAN_CONFIG`, then
/// `<config dir>/labscan/config.json`, then built-in defaults.
pub fn discover_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return load_config(path);
        }
    }

    if let Some(path) = user_config_path().filter(|p| p.is_file()) {
        return load_config(path);
    }

    tracing::debug!("No config file found, using defaults");
    Ok(Config::default())
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("labscan").join("config.json"))
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if !(MIN_DPI..=MAX_DPI).contains(&config.ocr.dpi) {
        return Err(ConfigError::Validation {
            message: format!(
                "OCR dpi {} is outside {}..={}",
                config.ocr.dpi, MIN_DPI, MAX_DPI
            ),
        });
    }

    if config.ocr.languages.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one OCR language is required".to_string(),
        });
    }

    Ok(())
}
