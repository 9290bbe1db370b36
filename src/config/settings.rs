//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pads::{LayerModel, ParserOptions};

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// PADS reader switches.
    #[serde(default)]
    pub parser: ParserOptions,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let LayerModel::Custom { layers, .. } = &self.parser.layer_model {
            if layers.is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "Custom layer model must list at least one layer code".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Refuse to write the output file when the conversion recorded warnings.
    #[serde(default)]
    pub fail_on_warnings: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.parser, ParserOptions::default());
        assert!(!config.output.fail_on_warnings);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "parser": {
                "piece_header_compatibility": true,
                "prioritize_padstack_binding_by_index": true,
                "layer_model": {
                    "custom": { "layers": [-2, -1, 0, 1], "all_layer_override": true }
                }
            },
            "output": {
                "fail_on_warnings": true
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.parser.piece_header_compatibility);
        assert!(config.parser.prioritize_padstack_binding_by_index);
        assert_eq!(config.parser.layer_model.all_layer_pattern(), &[-2, -1, 0]);
        assert!(config.output.fail_on_warnings);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn four_layer_model_by_name() {
        let json = r#"{ "parser": { "layer_model": "four_layer" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.parser.layer_model, LayerModel::FourLayer);
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_empty_custom_layers() {
        let json = r#"{
            "parser": {
                "layer_model": { "custom": { "layers": [] } }
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{ "parser": { "compat": true } }"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
