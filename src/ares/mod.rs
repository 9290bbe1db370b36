//! ARES 7 region file (`.RGN`) writer.
//!
//! # File Structure
//!
//! ```text
//! ARES REGION FILE
//!
//! *HEADER
//! VERSION 710 600
//! UNITS 10nm
//!
//! *OBJECTS
//! PAD "1" "CSMT-60" ALL 0 0 0 1
//! GRAPHIC TS LINE 4 -127000 127000 127000 127000
//! *END_OBJECTS
//!
//! *VIAS
//!
//! *END_VIAS
//!
//! *LAYER ALL
//! "T12" S 2 0 0 12700 12700
//! *END_LAYER
//! ```
//!
//! Lines end with CR-LF. Dimensions are whole thou, coordinates are plain
//! decimals in the header unit.

mod error;

pub use error::{AresError, AresResult};

use crate::diagnostics::Diagnostics;
use crate::pcb::{Design, GraphicsLayer, Pad, PadShape, PcbLayer, Trace};
use crate::units::{self, Unit, UnitResult};

const NEWLINE: &str = "\r\n";
const SIGNATURE: &str = "ARES REGION FILE\r\n\r\n";
const VERSION: &str = "VERSION 710 600";
const STANDARD_PAD_FLAGS: &str = "0 1";

/// Copper added around drill-only holes, in thou. Region files cannot
/// express a pad whose outer size equals its drill.
const DRILL_RING: f64 = 10.0;

/// Formats a dimension as a whole number, rounding half away from zero.
fn fixed(value: f64) -> String {
    let rounded = value.round();
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}")
}

/// Significant digits kept in a coordinate.
const COORDINATE_DIGITS: i32 = 15;
/// Finest coordinate step written, as a count of decimals.
const COORDINATE_DECIMALS: i32 = 6;

/// Formats a coordinate as a plain decimal.
///
/// Unit conversion leaves noise in the last bits, so the value is rounded
/// to 15 significant digits and at most 6 decimals. Trailing zeros are
/// dropped.
#[allow(clippy::cast_possible_truncation)]
fn coordinate(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        let value = if value == 0.0 { 0.0 } else { value };
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (COORDINATE_DIGITS - 1 - magnitude).clamp(0, COORDINATE_DECIMALS);
    let decimals = usize::try_from(decimals).unwrap_or_default();

    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let kept = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(kept);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// Region file code of a coordinate unit.
///
/// # Errors
///
/// Returns [`AresError::UnsupportedUnits`] for units without a code.
pub const fn unit_code(units: Unit) -> AresResult<&'static str> {
    match units {
        Unit::Thou => Ok("1th"),
        Unit::Millimeter => Ok("1mm"),
        Unit::TenNanometers => Ok("10nm"),
        Unit::Inch => Ok("1in"),
        Unit::TwoThirdsOfNanometer | Unit::Arbitrary => Err(AresError::UnsupportedUnits(units)),
    }
}

/// Region file code of a copper layer.
///
/// # Errors
///
/// Returns [`AresError::UnsupportedLayer`] for extended layers.
pub const fn layer_code(layer: PcbLayer) -> AresResult<&'static str> {
    match layer {
        PcbLayer::Drill => Ok("DRL"),
        PcbLayer::Bottom => Ok("BOT"),
        PcbLayer::Top => Ok("TOP"),
        PcbLayer::InternalTop => Ok("I1"),
        PcbLayer::InternalBottom => Ok("I2"),
        PcbLayer::All => Ok("ALL"),
        PcbLayer::Extended(_) => Err(AresError::UnsupportedLayer(layer)),
    }
}

/// Region file code of a graphics layer.
///
/// # Errors
///
/// Returns [`AresError::UnsupportedGraphicsLayer`] for anything but silkscreen.
pub const fn graphics_layer_code(layer: GraphicsLayer) -> AresResult<&'static str> {
    match layer {
        GraphicsLayer::TopSilk => Ok("TS"),
        GraphicsLayer::BottomSilk => Ok("BS"),
        GraphicsLayer::Boundary | GraphicsLayer::Other => {
            Err(AresError::UnsupportedGraphicsLayer(layer))
        }
    }
}

/// Pad style code: shape letter and whole-thou sizes.
///
/// The second size is the drill if there is one, otherwise the inner
/// dimension, otherwise zero. Drill-layer pads get a copper ring added to
/// the outer size.
///
/// # Errors
///
/// Fails if the ring allowance cannot be expressed in the style's unit.
pub fn style_code(pad: &Pad) -> UnitResult<String> {
    let style = &pad.style;
    let ring = if pad.layer == PcbLayer::Drill {
        units::convert(DRILL_RING, Unit::Thou, style.units())?
    } else {
        0.0
    };
    let outer = fixed(style.outer + ring);
    let second = fixed(
        style
            .drill
            .filter(|&drill| drill > 0.0)
            .or(style.inner)
            .unwrap_or(0.0),
    );
    Ok(match style.shape {
        PadShape::CircularTh => format!("C-{outer}-{second}"),
        PadShape::RectangularSmt => format!("{outer}X{second}"),
        PadShape::RectangularTh => format!("S-{outer}-{second}"),
        PadShape::CircularSmt => format!("CSMT-{outer}"),
    })
}

fn trace_record(trace: &Trace) -> String {
    let points = trace
        .points
        .iter()
        .map(|p| format!("{} {}", coordinate(p.x), coordinate(p.y)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "\"T{}\" S {} {points}",
        fixed(trace.thickness),
        trace.segments()
    )
}

/// ARES 7 region file writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AresWriter;

impl AresWriter {
    /// Unit the writer expects for pad sizes and line widths.
    pub const DIMENSION_UNITS: Unit = Unit::Thou;
    /// Unit the writer expects for coordinates.
    pub const COORDINATE_UNITS: Unit = Unit::TenNanometers;

    /// Creates a writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Brings `design` to [`Self::DIMENSION_UNITS`] and [`Self::COORDINATE_UNITS`].
    ///
    /// # Errors
    ///
    /// Fails if an object's unit is not convertible.
    pub fn prepare(design: &mut Design) -> UnitResult<()> {
        design.synchronize_units(Self::DIMENSION_UNITS)?;
        design.synchronize_coordinate_units(Self::COORDINATE_UNITS)
    }

    /// Encodes a design as region file text.
    ///
    /// The design must already be in the writer's units (see
    /// [`prepare`](Self::prepare)); values are written as stored. Pads,
    /// graphics lines and trace layers that have no region file code are
    /// skipped and recorded in `diagnostics`.
    ///
    /// # Errors
    ///
    /// Fails if the design's coordinate unit has no region file code, or a
    /// drill ring cannot be converted to a pad's unit.
    pub fn write(&self, design: &Design, diagnostics: &mut Diagnostics) -> AresResult<String> {
        let units = unit_code(design.coordinate_units())?;

        let mut out = String::from(SIGNATURE);
        out.push_str(&format!("*HEADER{NEWLINE}{VERSION}{NEWLINE}UNITS {units}{NEWLINE}{NEWLINE}"));

        let mut objects = Vec::with_capacity(design.pads.len());
        for pad in &design.pads {
            let layer = match layer_code(pad.layer) {
                Ok(layer) => layer,
                Err(e) => {
                    diagnostics.record(&e);
                    continue;
                }
            };
            let style = style_code(pad).map_err(|_| AresError::UnsupportedUnits(pad.style.units()))?;
            objects.push(format!(
                "PAD \"{}\" \"{style}\" {layer} {} {} {}",
                pad.designator,
                coordinate(pad.position.x),
                coordinate(pad.position.y),
                pad.flags.as_deref().unwrap_or(STANDARD_PAD_FLAGS)
            ));
        }
        for graphics in &design.graphics {
            let layer = match graphics_layer_code(graphics.layer) {
                Ok(layer) => layer,
                Err(e) => {
                    for _ in &graphics.lines {
                        diagnostics.record(&e);
                    }
                    continue;
                }
            };
            for line in &graphics.lines {
                objects.push(format!(
                    "GRAPHIC {layer} LINE 4 {} {} {} {}",
                    coordinate(line.start.x),
                    coordinate(line.start.y),
                    coordinate(line.end.x),
                    coordinate(line.end.y)
                ));
            }
        }
        push_block(&mut out, "*OBJECTS", &objects, "*END_OBJECTS");

        // Vias are not modeled.
        push_block(&mut out, "*VIAS", &[], "*END_VIAS");

        for layer in design.layers(true) {
            let code = match layer_code(layer) {
                Ok(code) => code,
                Err(e) => {
                    diagnostics.record(&e);
                    continue;
                }
            };
            let records: Vec<String> = design.traces_on_layer(layer).map(trace_record).collect();
            push_block(&mut out, &format!("*LAYER {code}"), &records, "*END_LAYER");
        }

        for layer in design.layers(false) {
            tracing::trace!(
                ?layer,
                pads = design.pads_on_layer(layer).count(),
                traces = design.traces_on_layer(layer).count(),
                "Layer contents"
            );
        }
        tracing::debug!(
            pads = design.pads.len(),
            graphics = design.graphics.len(),
            traces = design.traces.len(),
            bytes = out.len(),
            "Wrote region file"
        );
        Ok(out)
    }
}

/// Appends `open`, the records, `close` and a blank line.
fn push_block(out: &mut String, open: &str, records: &[String], close: &str) {
    out.push_str(open);
    out.push_str(NEWLINE);
    out.push_str(&records.join(NEWLINE));
    out.push_str(NEWLINE);
    out.push_str(close);
    out.push_str(NEWLINE);
    out.push_str(NEWLINE);
}
