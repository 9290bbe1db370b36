//! Error types for PADS ASCII decoding.

use thiserror::Error;

use crate::diagnostics::{Fault, FaultCategory};
use crate::units::UnitError;

/// Result type for PADS decoding.
pub type PadsResult<T> = Result<T, PadsError>;

/// Errors that can occur while decoding a PADS ASCII document.
///
/// The document-level variants (file header, decal header, units) abort the
/// conversion. The others are raised for a single piece, padstack, stackline
/// or terminal and are recorded as diagnostics by the reader.
#[derive(Debug, Error)]
pub enum PadsError {
    /// The `!…!` file header is missing or malformed.
    #[error("No PADS file header at the top of the document")]
    MissingFileHeader,

    /// The file header declares a unit token that is not recognized.
    #[error("File header unit token '{token}' is not recognized")]
    UnknownFileUnits {
        /// Token found between the last separator and the header delimiter.
        token: String,
    },

    /// A decal header declares a unit token that is not recognized.
    #[error("Decal unit token '{token}' is not recognized")]
    UnknownDecalUnits {
        /// Unit field of the decal header.
        token: String,
    },

    /// A required field is absent.
    #[error("{record} has no {field}")]
    MissingField {
        /// Record being parsed.
        record: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field is present but cannot be parsed.
    #[error("{record} {field} '{value}' is not a valid number")]
    MalformedField {
        /// Record being parsed.
        record: &'static str,
        /// Name of the field.
        field: &'static str,
        /// Raw field text.
        value: String,
    },

    /// A record ends before its declared number of lines.
    #[error("{record} declares {expected} lines but only {found} follow")]
    TruncatedRecord {
        /// Record being parsed.
        record: &'static str,
        /// Declared line count.
        expected: usize,
        /// Lines actually available.
        found: usize,
    },

    /// A stackline uses a shape code that is not recognized.
    #[error("Stackline shape code '{code}' is not recognized")]
    UnknownShape {
        /// Raw shape code.
        code: String,
    },

    /// A stackline uses a shape that has no pad style equivalent.
    #[error("{shape} pad ignored")]
    UnsupportedShape {
        /// Shape name.
        shape: &'static str,
    },

    /// A stackline lacks an argument its shape needs.
    #[error("{shape} pad needs its {argument}")]
    MissingArgument {
        /// Shape name.
        shape: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// A piece header names a type the reader does not implement.
    #[error("{kind} piece ignored")]
    UnknownPieceType {
        /// Raw type token.
        kind: String,
    },

    /// Decoded geometry could not be brought to the design's units.
    #[error(transparent)]
    Units(#[from] UnitError),
}

impl PadsError {
    /// Creates a missing field error.
    #[must_use]
    pub const fn missing_field(record: &'static str, field: &'static str) -> Self {
        Self::MissingField { record, field }
    }

    /// Creates a malformed field error.
    pub fn malformed_field(record: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedField {
            record,
            field,
            value: value.into(),
        }
    }
}

impl Fault for PadsError {
    fn category(&self) -> FaultCategory {
        match self {
            Self::UnknownShape { .. } | Self::UnsupportedShape { .. } => {
                FaultCategory::UnsupportedShape
            }
            Self::MissingArgument { .. } => FaultCategory::MissingArgument,
            Self::UnknownPieceType { .. } => FaultCategory::UnimplementedPieceType,
            Self::MissingFileHeader
            | Self::UnknownFileUnits { .. }
            | Self::UnknownDecalUnits { .. }
            | Self::MissingField { .. }
            | Self::MalformedField { .. }
            | Self::TruncatedRecord { .. }
            | Self::Units(_) => FaultCategory::MalformedField,
        }
    }
}
