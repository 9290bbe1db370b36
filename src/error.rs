//! Crate-level error types.
//!
//! Format-specific errors live next to their reader or writer
//! ([`PadsError`], [`AresError`]); this module holds the errors of the
//! layers that tie them together.

use std::path::PathBuf;

use thiserror::Error;

use crate::ares::AresError;
use crate::convert::EdaFormat;
use crate::pads::PadsError;
use crate::units::UnitError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors that stop a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source document could not be interpreted.
    #[error("failed to decode source document: {0}")]
    Decode(#[from] PadsError),

    /// The target document could not be produced.
    #[error("failed to encode target document: {0}")]
    Encode(#[from] AresError),

    /// The decoded design could not be brought to the target's units.
    #[error("failed to convert units: {0}")]
    Units(#[from] UnitError),

    /// No converter exists for this pair of formats.
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion {
        /// Source format.
        from: EdaFormat,
        /// Destination format.
        to: EdaFormat,
    },
}
