//! Document conversion between EDA formats.
//!
//! A conversion decodes the source text into a [`Design`], brings it to the
//! writer's units and encodes it. Recoverable faults from both sides end up
//! in one [`Diagnostics`] list, decoder entries first.

use std::fmt;

use serde::Serialize;

use crate::ares::AresWriter;
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::pads::{PadsReader, ParserOptions};
use crate::pcb::Design;

/// Result type for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Document formats known to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdaFormat {
    /// PADS ASCII (PowerPCB) export. Read only.
    PadsAscii,
    /// ARES 7 region file. Write only.
    AresRegion,
}

impl fmt::Display for EdaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PadsAscii => "PADS ASCII",
            Self::AresRegion => "ARES region file",
        })
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Target document text.
    pub output: String,
    /// Decoded design, in the writer's units.
    pub design: Design,
    /// Recoverable faults in encounter order.
    pub diagnostics: Diagnostics,
}

impl Conversion {
    /// Returns `true` if any fault was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Converts `text` from `source` to `destination`.
///
/// # Errors
///
/// Fails if the pair of formats is not supported, the source document
/// cannot be interpreted, or the design cannot be written. Nothing is
/// produced in that case.
pub fn convert(
    text: &str,
    source: EdaFormat,
    destination: EdaFormat,
    options: &ParserOptions,
) -> ConvertResult<Conversion> {
    if (source, destination) != (EdaFormat::PadsAscii, EdaFormat::AresRegion) {
        return Err(ConvertError::UnsupportedConversion {
            from: source,
            to: destination,
        });
    }

    let mut diagnostics = Diagnostics::new();
    let mut design = PadsReader::new(options.clone()).read(text, &mut diagnostics)?;
    AresWriter::prepare(&mut design)?;
    let output = AresWriter::new().write(&design, &mut diagnostics)?;

    tracing::info!(
        pads = design.pads.len(),
        traces = design.traces.len(),
        graphics = design.graphics.len(),
        warnings = diagnostics.len(),
        "Converted {source} to {destination}"
    );

    Ok(Conversion {
        output,
        design,
        diagnostics,
    })
}

/// Converts a PADS ASCII document to an ARES region file.
///
/// # Errors
///
/// See [`convert`].
pub fn pads_to_ares(text: &str, options: &ParserOptions) -> ConvertResult<Conversion> {
    convert(text, EdaFormat::PadsAscii, EdaFormat::AresRegion, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pads::PadsError;

    const R0805: &str = "!PADS-POWERPCB-V9.0-MILS! DESIGN DATABASE ASCII FILE 1.0\r\n\
                         *PARTDECAL*  ITEMS\r\n\
                         \r\n\
                         R0805 I 0 0 0 1 1 0 0\r\n\
                         T 0 0 0 0 1\r\n\
                         PAD 0 3\r\n\
                         -2 60 R\r\n\
                         -1 60 R\r\n\
                         0 60 R\r\n\
                         \r\n\
                         *END*\r\n";

    #[test]
    fn converts_minimal_decal() {
        let conversion = pads_to_ares(R0805, &ParserOptions::default()).unwrap();
        assert!(!conversion.has_warnings());
        assert!(conversion
            .output
            .contains("*OBJECTS\r\nPAD \"1\" \"CSMT-60\" ALL 0 0 0 1\r\n*END_OBJECTS\r\n"));
    }

    #[test]
    fn reverse_direction_is_unsupported() {
        let result = convert(
            R0805,
            EdaFormat::AresRegion,
            EdaFormat::PadsAscii,
            &ParserOptions::default(),
        );
        assert!(matches!(
            result,
            Err(ConvertError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn malformed_header_produces_nothing() {
        let result = pads_to_ares("*PARTDECAL*\n", &ParserOptions::default());
        assert!(matches!(
            result,
            Err(ConvertError::Decode(PadsError::MissingFileHeader))
        ));
    }
}
