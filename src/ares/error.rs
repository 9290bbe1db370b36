//! Error types for ARES region file encoding.

use thiserror::Error;

use crate::diagnostics::{Fault, FaultCategory};
use crate::pcb::{GraphicsLayer, PcbLayer};
use crate::units::Unit;

/// Result type for ARES encoding.
pub type AresResult<T> = Result<T, AresError>;

/// Errors that can occur while encoding a region file.
///
/// [`AresError::UnsupportedUnits`] aborts the write. The layer variants are
/// raised for a single pad, graphics line or trace layer and are recorded
/// as diagnostics by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AresError {
    /// A copper layer with no region file code.
    #[error("{0:?} has no region file layer code")]
    UnsupportedLayer(PcbLayer),

    /// A graphics layer with no region file code.
    #[error("{0:?} graphics have no region file layer code")]
    UnsupportedGraphicsLayer(GraphicsLayer),

    /// A coordinate unit with no region file code.
    #[error("{0:?} has no region file unit code")]
    UnsupportedUnits(Unit),
}

impl Fault for AresError {
    fn category(&self) -> FaultCategory {
        match self {
            Self::UnsupportedLayer(_) | Self::UnsupportedGraphicsLayer(_) => {
                FaultCategory::UnsupportedLayer
            }
            Self::UnsupportedUnits(_) => FaultCategory::MalformedField,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AresError::UnsupportedLayer(PcbLayer::Extended(5));
        assert_eq!(err.to_string(), "Extended(5) has no region file layer code");
        assert_eq!(err.category(), FaultCategory::UnsupportedLayer);

        let err = AresError::UnsupportedGraphicsLayer(GraphicsLayer::Boundary);
        assert_eq!(err.to_string(), "Boundary graphics have no region file layer code");
    }
}
