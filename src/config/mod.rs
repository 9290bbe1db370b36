//! Converter settings stored as JSON.
//!
//! A settings file holds the PADS reader switches, the warning policy and
//! the log level, so a board's quirks (piece header layout, padstack binding
//! order, extra copper layers) need not be repeated on every run. Command
//! line flags are applied on top of the loaded values.
//!
//! The file is `--config <path>` when given, which must then exist.
//! Otherwise `config.json` in [`default_config_dir`] is read if present,
//! and the built-in defaults apply when it is not.
//!
//! A six-layer board whose padstacks list layers `-2 -1 0 1 2 3`:
//!
//! ```json
//! {
//!     "parser": {
//!         "prioritize_padstack_binding_by_index": true,
//!         "layer_model": {
//!             "custom": { "layers": [-2, -1, 0, 1, 2, 3], "all_layer_override": true }
//!         }
//!     },
//!     "output": { "fail_on_warnings": true },
//!     "logging": { "level": "info" }
//! }
//! ```

mod settings;

pub use settings::{Config, LoggingConfig, OutputConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Directory searched for `config.json` when no path is given:
/// `.pads-ares-converter` under the user's home directory.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".pads-ares-converter"))
}

/// Settings file read when no path is given.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and validates converter settings.
///
/// With `path` set, that file must exist. Without it the default file is
/// read when present, and [`Config::default`] is returned otherwise.
///
/// # Errors
///
/// Fails when the given file is missing or unreadable, is not valid JSON
/// for [`Config`], or names an empty custom layer list.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                tracing::debug!("No configuration file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), "Loaded settings");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::pads::LayerModel;

    #[test]
    fn default_config_dir_exists() {
        assert!(default_config_dir().is_some());
    }

    #[test]
    fn default_config_path_exists() {
        let path = default_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("config.json"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("missing.json")));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn loads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "parser": {{ "piece_header_compatibility": true }}, "logging": {{ "level": "info" }} }}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(config.parser.piece_header_compatibility);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "parser": {{ "layer_model": {{ "custom": {{ "layers": [] }} }} }} }}"#).unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn documented_six_layer_example_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "parser": {{
                    "prioritize_padstack_binding_by_index": true,
                    "layer_model": {{
                        "custom": {{ "layers": [-2, -1, 0, 1, 2, 3], "all_layer_override": true }}
                    }}
                }},
                "output": {{ "fail_on_warnings": true }},
                "logging": {{ "level": "info" }}
            }}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(config.parser.prioritize_padstack_binding_by_index);
        assert!(config.output.fail_on_warnings);
        assert_eq!(
            config.parser.layer_model,
            LayerModel::Custom {
                layers: vec![-2, -1, 0, 1, 2, 3],
                all_layer_override: true,
            }
        );
    }
}
