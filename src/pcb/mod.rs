//! Unit-tagged geometric model shared by every reader and writer.
//!
//! A [`Design`] holds the pads, copper traces and graphics of one
//! footprint. Readers produce it, writers consume it; neither side knows
//! about the other's file format.
//!
//! ```text
//! Design
//! ├── pads      Pad { designator, position, layer, PadStyle }
//! ├── traces    Trace { layer, thickness, points }
//! └── graphics  Graphics { layer, lines: [SilkLine] }
//! ```

pub mod primitives;

use serde::{Deserialize, Serialize};

pub use primitives::{
    Graphics, GraphicsLayer, LineType, Pad, PadShape, PadStyle, PcbLayer, Point, SilkLine, Trace,
};

use crate::units::{Unit, UnitResult};

/// A footprint design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Pads.
    #[serde(default)]
    pub pads: Vec<Pad>,

    /// Copper traces.
    #[serde(default)]
    pub traces: Vec<Trace>,

    /// Silkscreen and outline graphics.
    #[serde(default)]
    pub graphics: Vec<Graphics>,

    /// Coordinate unit the contents were last synchronized to.
    coordinate_units: Unit,
}

impl Design {
    /// Creates an empty design whose coordinates are declared in `coordinate_units`.
    #[must_use]
    pub const fn new(coordinate_units: Unit) -> Self {
        Self {
            pads: Vec::new(),
            traces: Vec::new(),
            graphics: Vec::new(),
            coordinate_units,
        }
    }

    /// Coordinate unit of the design.
    ///
    /// Contained objects may still use other units until
    /// [`synchronize_coordinate_units`](Self::synchronize_coordinate_units) runs.
    #[must_use]
    pub const fn coordinate_units(&self) -> Unit {
        self.coordinate_units
    }

    /// Returns `true` if the design has no pads, traces or graphics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pads.is_empty() && self.traces.is_empty() && self.graphics.is_empty()
    }

    /// Distinct layers in order of first appearance.
    ///
    /// With `traces_only` set, pads are not considered.
    #[must_use]
    pub fn layers(&self, traces_only: bool) -> Vec<PcbLayer> {
        let pad_layers = self
            .pads
            .iter()
            .filter(|_| !traces_only)
            .map(|pad| pad.layer);
        let trace_layers = self.traces.iter().map(|trace| trace.layer);

        let mut layers = Vec::new();
        for layer in pad_layers.chain(trace_layers) {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        layers
    }

    /// Traces on `layer`, in design order.
    pub fn traces_on_layer(&self, layer: PcbLayer) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(move |trace| trace.layer == layer)
    }

    /// Pads on `layer`, in design order.
    pub fn pads_on_layer(&self, layer: PcbLayer) -> impl Iterator<Item = &Pad> {
        self.pads.iter().filter(move |pad| pad.layer == layer)
    }

    /// Converts the coordinates of every object to `units` and adopts them
    /// as the design's coordinate unit.
    ///
    /// # Errors
    ///
    /// Fails if an object's coordinate unit cannot be converted. Objects
    /// visited before the failure keep their new unit.
    pub fn synchronize_coordinate_units(&mut self, units: Unit) -> UnitResult<()> {
        for pad in &mut self.pads {
            pad.set_coordinate_units(units)?;
        }
        for trace in &mut self.traces {
            trace.set_coordinate_units(units)?;
        }
        for graphics in &mut self.graphics {
            graphics.synchronize_coordinate_units(units)?;
        }
        self.coordinate_units = units;
        Ok(())
    }

    /// Converts the dimensions (pad sizes, widths) of every object to `units`.
    ///
    /// # Errors
    ///
    /// Fails if an object's dimensional unit cannot be converted.
    pub fn synchronize_units(&mut self, units: Unit) -> UnitResult<()> {
        for pad in &mut self.pads {
            pad.set_units(units)?;
        }
        for trace in &mut self.traces {
            trace.set_units(units)?;
        }
        for graphics in &mut self.graphics {
            graphics.synchronize_units(units)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(layer: PcbLayer, units: Unit) -> Pad {
        Pad::new(
            "1",
            units,
            Point::new(1.0, 2.0),
            layer,
            PadStyle::new(PadShape::CircularSmt, units, 1.0, None, None),
        )
    }

    fn trace(layer: PcbLayer, units: Unit) -> Trace {
        Trace::new(
            layer,
            0.2,
            units,
            units,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        )
    }

    #[test]
    fn layers_in_first_appearance_order() {
        let mut design = Design::new(Unit::Thou);
        design.pads.push(pad(PcbLayer::Top, Unit::Thou));
        design.pads.push(pad(PcbLayer::All, Unit::Thou));
        design.traces.push(trace(PcbLayer::Bottom, Unit::Thou));
        design.traces.push(trace(PcbLayer::Top, Unit::Thou));

        assert_eq!(
            design.layers(false),
            vec![PcbLayer::Top, PcbLayer::All, PcbLayer::Bottom]
        );
        assert_eq!(design.layers(true), vec![PcbLayer::Bottom, PcbLayer::Top]);
        assert_eq!(design.traces_on_layer(PcbLayer::Top).count(), 1);
        assert_eq!(design.pads_on_layer(PcbLayer::Bottom).count(), 0);
        let top: Vec<_> = design.pads_on_layer(PcbLayer::Top).collect();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].layer, PcbLayer::Top);
    }

    #[test]
    fn synchronization_reaches_every_object() {
        let mut design = Design::new(Unit::Millimeter);
        design.pads.push(pad(PcbLayer::Top, Unit::Millimeter));
        design.traces.push(trace(PcbLayer::All, Unit::Inch));
        let mut graphics = Graphics::new(Unit::Thou, Unit::Thou, GraphicsLayer::TopSilk);
        graphics.lines.push(SilkLine::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Unit::Thou,
            Unit::Thou,
            5.0,
            LineType::Dashed,
        ));
        design.graphics.push(graphics);

        design.synchronize_coordinate_units(Unit::TenNanometers).unwrap();
        design.synchronize_units(Unit::Thou).unwrap();

        assert_eq!(design.coordinate_units(), Unit::TenNanometers);
        assert!(design
            .pads
            .iter()
            .all(|p| p.coordinate_units() == Unit::TenNanometers && p.units() == Unit::Thou));
        assert!(design
            .traces
            .iter()
            .all(|t| t.coordinate_units() == Unit::TenNanometers && t.units() == Unit::Thou));
        assert!(design
            .graphics
            .iter()
            .all(|g| g.coordinate_units() == Unit::TenNanometers && g.units() == Unit::Thou));
    }

    #[test]
    fn empty_design() {
        let design = Design::new(Unit::Thou);
        assert!(design.is_empty());
        assert!(design.layers(false).is_empty());
    }
}
