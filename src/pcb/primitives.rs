//! Geometric primitives of a footprint design.
//!
//! Every primitive records the unit of its coordinates and the unit of its
//! dimensions (widths, pad sizes) separately. Changing a unit rescales the
//! stored magnitudes and retags them in one step.

use serde::{Deserialize, Serialize};

use crate::units::{Unit, UnitResult};

/// Rescale factor for a unit change, or `None` when nothing needs to change.
fn rescale(from: Unit, to: Unit) -> UnitResult<Option<f64>> {
    if from == to {
        return Ok(None);
    }
    from.factor_to(to).map(Some)
}

/// A point in the coordinate unit of the primitive that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Copper layer assignment of pads and traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PcbLayer {
    /// Drill-only hole.
    Drill,
    /// Every copper layer.
    All,
    /// Bottom copper.
    Bottom,
    /// Internal layer nearest the bottom.
    InternalBottom,
    /// Internal layer nearest the top.
    InternalTop,
    /// Top copper.
    Top,
    /// A source layer number outside the layers above.
    Extended(i32),
}

/// Layer of graphics (silkscreen and outline) objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicsLayer {
    /// Bottom silkscreen.
    BottomSilk,
    /// Top silkscreen.
    TopSilk,
    /// Board boundary.
    Boundary,
    /// Anything else (documentation, assembly).
    Other,
}

/// Pad shape as understood by the geometric model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadShape {
    /// Circular plated through-hole pad.
    CircularTh,
    /// Rectangular plated through-hole pad.
    RectangularTh,
    /// Rectangular surface-mount pad.
    RectangularSmt,
    /// Circular surface-mount pad.
    CircularSmt,
}

/// Stroke style of a graphics line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
}

/// Shape and dimensions of a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadStyle {
    /// Pad shape.
    pub shape: PadShape,
    /// Outer dimension: diameter, or width for rectangular pads.
    pub outer: f64,
    /// Inner dimension: annulus diameter, or height for rectangular pads.
    pub inner: Option<f64>,
    /// Drill hole diameter.
    pub drill: Option<f64>,
    units: Unit,
}

impl PadStyle {
    /// Creates a pad style with dimensions in `units`.
    #[must_use]
    pub const fn new(
        shape: PadShape,
        units: Unit,
        outer: f64,
        inner: Option<f64>,
        drill: Option<f64>,
    ) -> Self {
        Self {
            shape,
            outer,
            inner,
            drill,
            units,
        }
    }

    /// Unit of the dimensions.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.units
    }

    /// Re-expresses every dimension in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier; the style is left
    /// untouched in that case.
    pub fn set_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.units, units)? {
            self.outer *= factor;
            self.inner = self.inner.map(|v| v * factor);
            self.drill = self.drill.map(|v| v * factor);
            self.units = units;
        }
        Ok(())
    }
}

/// A placed pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Pin designator (e.g. "1", "A3").
    pub designator: String,
    /// Placement point.
    pub position: Point,
    /// Copper layer.
    pub layer: PcbLayer,
    /// Shape and dimensions.
    pub style: PadStyle,
    /// Free-form target flags; the writer's defaults apply when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    coordinate_units: Unit,
}

impl Pad {
    /// Creates a pad without flags.
    #[must_use]
    pub fn new(
        designator: impl Into<String>,
        coordinate_units: Unit,
        position: Point,
        layer: PcbLayer,
        style: PadStyle,
    ) -> Self {
        Self {
            designator: designator.into(),
            position,
            layer,
            style,
            flags: None,
            coordinate_units,
        }
    }

    /// Unit of the placement point.
    #[must_use]
    pub const fn coordinate_units(&self) -> Unit {
        self.coordinate_units
    }

    /// Unit of the pad dimensions.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.style.units()
    }

    /// Re-expresses the placement point in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_coordinate_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.coordinate_units, units)? {
            self.position = self.position.scaled(factor);
            self.coordinate_units = units;
        }
        Ok(())
    }

    /// Re-expresses the pad dimensions in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_units(&mut self, units: Unit) -> UnitResult<()> {
        self.style.set_units(units)
    }
}

/// A copper polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Copper layer.
    pub layer: PcbLayer,
    /// Track width.
    pub thickness: f64,
    /// Connected vertices, at least two.
    pub points: Vec<Point>,
    units: Unit,
    coordinate_units: Unit,
}

impl Trace {
    /// Creates a trace.
    #[must_use]
    pub const fn new(
        layer: PcbLayer,
        thickness: f64,
        units: Unit,
        coordinate_units: Unit,
        points: Vec<Point>,
    ) -> Self {
        Self {
            layer,
            thickness,
            points,
            units,
            coordinate_units,
        }
    }

    /// Number of vertices, written as the segment count by region files.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.points.len()
    }

    /// Unit of the thickness.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.units
    }

    /// Unit of the vertices.
    #[must_use]
    pub const fn coordinate_units(&self) -> Unit {
        self.coordinate_units
    }

    /// Re-expresses the vertices in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_coordinate_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.coordinate_units, units)? {
            for point in &mut self.points {
                *point = point.scaled(factor);
            }
            self.coordinate_units = units;
        }
        Ok(())
    }

    /// Re-expresses the thickness in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.units, units)? {
            self.thickness *= factor;
            self.units = units;
        }
        Ok(())
    }
}

/// One straight segment of a graphics object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilkLine {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Stroke width.
    pub thickness: f64,
    /// Stroke style.
    #[serde(default)]
    pub line_type: LineType,
    units: Unit,
    coordinate_units: Unit,
}

impl SilkLine {
    /// Creates a line segment.
    #[must_use]
    pub const fn new(
        start: Point,
        end: Point,
        units: Unit,
        coordinate_units: Unit,
        thickness: f64,
        line_type: LineType,
    ) -> Self {
        Self {
            start,
            end,
            thickness,
            line_type,
            units,
            coordinate_units,
        }
    }

    /// Unit of the stroke width.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.units
    }

    /// Unit of the end points.
    #[must_use]
    pub const fn coordinate_units(&self) -> Unit {
        self.coordinate_units
    }

    /// Re-expresses the stroke width in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.units, units)? {
            self.thickness *= factor;
            self.units = units;
        }
        Ok(())
    }

    /// Re-expresses the end points in `units`.
    ///
    /// # Errors
    ///
    /// Fails if either unit has no conversion multiplier.
    pub fn set_coordinate_units(&mut self, units: Unit) -> UnitResult<()> {
        if let Some(factor) = rescale(self.coordinate_units, units)? {
            self.start = self.start.scaled(factor);
            self.end = self.end.scaled(factor);
            self.coordinate_units = units;
        }
        Ok(())
    }
}

/// A silkscreen or outline drawing made of line segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphics {
    /// Graphics layer.
    pub layer: GraphicsLayer,
    /// Line segments in drawing order.
    pub lines: Vec<SilkLine>,
    units: Unit,
    coordinate_units: Unit,
}

impl Graphics {
    /// Creates an empty graphics object.
    #[must_use]
    pub const fn new(units: Unit, coordinate_units: Unit, layer: GraphicsLayer) -> Self {
        Self {
            layer,
            lines: Vec::new(),
            units,
            coordinate_units,
        }
    }

    /// Unit of the stroke widths.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.units
    }

    /// Unit of the end points.
    #[must_use]
    pub const fn coordinate_units(&self) -> Unit {
        self.coordinate_units
    }

    /// Brings every line's stroke width to `units`.
    ///
    /// # Errors
    ///
    /// Fails if a line's unit cannot be converted.
    pub fn synchronize_units(&mut self, units: Unit) -> UnitResult<()> {
        for line in &mut self.lines {
            line.set_units(units)?;
        }
        self.units = units;
        Ok(())
    }

    /// Brings every line's end points to `units`.
    ///
    /// # Errors
    ///
    /// Fails if a line's coordinate unit cannot be converted.
    pub fn synchronize_coordinate_units(&mut self, units: Unit) -> UnitResult<()> {
        for line in &mut self.lines {
            line.set_coordinate_units(units)?;
        }
        self.coordinate_units = units;
        Ok(())
    }
}
