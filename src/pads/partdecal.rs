//! PARTDECAL records: decal header, pieces, terminals and padstacks.
//!
//! A decal starts with a header line
//!
//! ```text
//! name units x y pieces terminals stacks text labels
//! ```
//!
//! followed by free-running records. The header counts are used as upper
//! bounds while scanning for each record type; a record that fails to parse
//! is reported and skipped without stopping the scan.
//!
//! ```text
//! OPEN 2 10 26 -1          piece: type, point count, width, layer, pin
//! -50 50
//! 50 50
//! T-50 0 -50 0 1           terminal: x, y, number x, number y, pin
//! PAD 0 3                  padstack: pin (0 = every pin), line count
//! -2 60 R                  stackline: layer, size, shape, shape arguments
//! -1 60 R
//! 0 60 R
//! ```

use std::str::FromStr;

use super::error::{PadsError, PadsResult};
use super::ParserOptions;
use crate::diagnostics::{Diagnostics, Fault};
use crate::pcb::Point;
use crate::units::Unit;

/// Decal unit tokens.
const DECAL_UNITS: [(Unit, &str); 2] = [(Unit::Thou, "I"), (Unit::Millimeter, "M")];

/// Field positions in the decal header line.
mod decal_field {
    pub const NAME: usize = 0;
    pub const UNITS: usize = 1;
    pub const PIECES: usize = 4;
    pub const TERMINALS: usize = 5;
    pub const STACKS: usize = 6;
}

/// Whitespace-separated fields of one record line.
struct Fields<'a> {
    record: &'static str,
    items: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(record: &'static str, line: &'a str) -> Self {
        Self {
            record,
            items: line.split_whitespace().collect(),
        }
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        self.items.get(index).copied()
    }

    fn str(&self, index: usize, field: &'static str) -> PadsResult<&'a str> {
        self.get(index)
            .ok_or_else(|| PadsError::missing_field(self.record, field))
    }

    fn parse<T: FromStr>(&self, index: usize, field: &'static str) -> PadsResult<T> {
        let raw = self.str(index, field)?;
        raw.parse()
            .map_err(|_| PadsError::malformed_field(self.record, field, raw))
    }

    /// A numeric field that only counts when present and well-formed.
    fn optional(&self, index: usize) -> Option<f64> {
        let raw = self.get(index)?;
        let value = raw.parse().ok();
        if value.is_none() {
            tracing::debug!(record = self.record, index, raw, "Ignoring non-numeric argument");
        }
        value
    }
}

/// Finds `needle` in `haystack` at or after byte offset `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|pos| pos + from)
}

/// A decoded decal.
#[derive(Debug)]
pub struct Partdecal {
    /// Decal name.
    pub name: String,
    /// Unit named by the decal's `I`/`M` token. Geometry is read in the
    /// file header's unit regardless.
    pub units: Unit,
    /// Outline and copper pieces.
    pub pieces: Vec<Piece>,
    /// Pin placements.
    pub terminals: Vec<Terminal>,
    /// Pad templates.
    pub padstacks: Vec<PadStack>,
}

impl Partdecal {
    /// Parses the first decal of a PARTDECAL section.
    ///
    /// Returns `Ok(None)` for a blank section.
    ///
    /// # Errors
    ///
    /// Fails if the decal header line cannot be parsed. Faults in individual
    /// records are recorded in `diagnostics` instead.
    pub fn parse(
        section: &str,
        options: &ParserOptions,
        diagnostics: &mut Diagnostics,
    ) -> PadsResult<Option<Self>> {
        let Some(header_line) = section.lines().find(|line| !line.trim().is_empty()) else {
            return Ok(None);
        };
        let header = Fields::new("decal header", header_line);
        let piece_count: usize = header.parse(decal_field::PIECES, "pieces")?;
        let terminal_count: usize = header.parse(decal_field::TERMINALS, "terminals")?;
        let stack_count: usize = header.parse(decal_field::STACKS, "stacks")?;
        let name = header.str(decal_field::NAME, "name")?.to_string();
        let unit_token = header.str(decal_field::UNITS, "units")?;
        let units = DECAL_UNITS
            .iter()
            .find(|(_, token)| *token == unit_token)
            .map(|(unit, _)| *unit)
            .ok_or_else(|| PadsError::UnknownDecalUnits {
                token: unit_token.to_string(),
            })?;

        tracing::debug!(
            name = %name,
            ?units,
            pieces = piece_count,
            terminals = terminal_count,
            stacks = stack_count,
            "Parsing decal"
        );

        let header_offset = section.find(header_line).unwrap_or(0);
        let body_start = header_offset + header_line.len();
        let mut decal = Self {
            name,
            units,
            pieces: Vec::with_capacity(piece_count),
            terminals: Vec::with_capacity(terminal_count),
            padstacks: Vec::with_capacity(stack_count),
        };

        for kind in PieceKind::SCAN_ORDER {
            let marker = kind.token();
            let mut cursor = body_start;
            for _ in 0..piece_count {
                let Some(pos) = find_from(section, marker, cursor) else {
                    break;
                };
                match Piece::parse(&section[pos..], options.piece_header_compatibility) {
                    Ok(piece) => decal.pieces.push(piece),
                    Err(e) => diagnostics.record(&e),
                }
                cursor = pos + marker.len() + 1;
            }
        }

        let mut cursor = body_start;
        for _ in 0..stack_count {
            let Some(pos) = find_from(section, PadStack::PREFIX, cursor) else {
                break;
            };
            match PadStack::parse(&section[pos..], diagnostics) {
                Ok(stack) => decal.padstacks.push(stack),
                Err(e) => diagnostics.record(&e),
            }
            cursor = pos + PadStack::PREFIX.len() + 1;
        }

        // The header's own line break may precede the first terminal.
        let mut cursor = body_start;
        for index in 1..=terminal_count {
            let Some(pos) = find_from(section, Terminal::PREFIX, cursor) else {
                break;
            };
            let definition = &section[pos + Terminal::PREFIX.len()..];
            match Terminal::parse(definition, index) {
                Ok(terminal) => decal.terminals.push(terminal),
                Err(e) => diagnostics.record(&e),
            }
            cursor = pos + Terminal::PREFIX.len();
        }

        tracing::debug!(
            pieces = decal.pieces.len(),
            terminals = decal.terminals.len(),
            padstacks = decal.padstacks.len(),
            "Parsed decal"
        );

        Ok(Some(decal))
    }
}

/// Piece record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    /// Open polyline.
    Open,
    /// Closed polyline.
    Closed,
    /// Copper polyline.
    Copper,
}

impl PieceKind {
    /// Order in which piece types are collected.
    pub const SCAN_ORDER: [Self; 3] = [Self::Closed, Self::Open, Self::Copper];

    /// Header token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Copper => "COPPER",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::SCAN_ORDER.into_iter().find(|kind| kind.token() == token)
    }
}

/// An outline or copper polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    /// Record type.
    pub kind: PieceKind,
    /// Raw layer number.
    pub layer: i32,
    /// Line width.
    pub width: f64,
    /// Raw line style code (0 when the header does not carry one).
    pub line_style: i32,
    /// Associated pin number, if declared.
    pub pin: Option<i32>,
    /// Vertices.
    pub points: Vec<Point>,
}

impl Piece {
    /// Parses a piece header and its coordinate lines.
    ///
    /// With `compatibility` set the header follows the LINES-section layout
    /// `type count width style layer` used by some library generators;
    /// otherwise the PARTDECAL layout `type count width layer pin`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown type, a malformed header field, a malformed
    /// coordinate, or fewer coordinate lines than declared.
    pub fn parse(definition: &str, compatibility: bool) -> PadsResult<Self> {
        let mut lines = definition.lines();
        let header = Fields::new("piece", lines.next().unwrap_or_default());

        let token = header.str(0, "type")?;
        let kind = PieceKind::from_token(token).ok_or_else(|| PadsError::UnknownPieceType {
            kind: token.to_string(),
        })?;
        let count: usize = header.parse(1, "point count")?;
        let width: f64 = header.parse(2, "width")?;
        let (layer, line_style, pin) = if compatibility {
            (header.parse(4, "layer")?, header.parse(3, "line style")?, None)
        } else {
            (header.parse(3, "layer")?, 0, header.get(4).and_then(|s| s.parse().ok()))
        };

        let mut points = Vec::with_capacity(count);
        for found in 0..count {
            let line = lines.next().ok_or(PadsError::TruncatedRecord {
                record: "piece",
                expected: count,
                found,
            })?;
            let fields = Fields::new("piece point", line);
            points.push(Point::new(fields.parse(0, "x")?, fields.parse(1, "y")?));
        }

        tracing::trace!(?kind, layer, width, points = points.len(), "Parsed piece");

        Ok(Self {
            kind,
            layer,
            width,
            line_style,
            pin,
            points,
        })
    }
}

/// A placed pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    /// Pin placement.
    pub position: Point,
    /// Placement of the pin number label.
    pub number_position: Point,
    /// Pin designator.
    pub designator: String,
    /// 1-based discovery index, an alternative padstack binding key.
    pub index: usize,
}

impl Terminal {
    /// Text that introduces a terminal record.
    pub const PREFIX: &'static str = "\nT";

    /// Parses the rest of a terminal line (after the `T`).
    ///
    /// # Errors
    ///
    /// Fails on a missing or malformed field.
    pub fn parse(definition: &str, index: usize) -> PadsResult<Self> {
        let fields = Fields::new("terminal", definition.lines().next().unwrap_or_default());
        Ok(Self {
            position: Point::new(fields.parse(0, "x")?, fields.parse(1, "y")?),
            number_position: Point::new(
                fields.parse(2, "number x")?,
                fields.parse(3, "number y")?,
            ),
            designator: fields.str(4, "pin")?.to_string(),
            index,
        })
    }
}

/// Stackline layer code of the component-side layer.
pub const LAYER_TOP: i32 = -2;
/// Stackline layer code of all inner layers.
pub const LAYER_INNER: i32 = -1;
/// Stackline layer code of the opposite side.
pub const LAYER_BOTTOM: i32 = 0;

/// A padstack: per-layer pad geometry for one pin, or for every pin.
#[derive(Debug, Clone, PartialEq)]
pub struct PadStack {
    /// Pin designator, or [`PadStack::ALL_TERMINALS`].
    pub designator: String,
    /// Per-layer lines in declaration order.
    pub lines: Vec<StackLine>,
}

impl PadStack {
    /// Text that introduces a padstack record.
    pub const PREFIX: &'static str = "PAD ";
    /// Designator of the padstack that applies to every terminal.
    pub const ALL_TERMINALS: &'static str = "0";

    /// Parses a padstack header and its stacklines.
    ///
    /// A stackline that cannot be parsed is recorded in `diagnostics` and
    /// left out; the rest of the padstack is kept.
    ///
    /// # Errors
    ///
    /// Fails on a malformed header or fewer lines than declared.
    pub fn parse(definition: &str, diagnostics: &mut Diagnostics) -> PadsResult<Self> {
        let mut lines = definition.lines();
        let header = Fields::new("padstack", lines.next().unwrap_or_default());
        let designator = header.str(1, "pin")?.to_string();
        let count: usize = header.parse(2, "line count")?;

        let mut stack = Self {
            designator,
            lines: Vec::with_capacity(count),
        };
        for found in 0..count {
            let line = lines.next().ok_or(PadsError::TruncatedRecord {
                record: "padstack",
                expected: count,
                found,
            })?;
            match StackLine::parse(line) {
                Ok(stackline) => stack.lines.push(stackline),
                Err(e) => diagnostics.push(
                    e.category(),
                    format!("Padstack {}, line {}: {e}", stack.designator, found + 1),
                ),
            }
        }
        Ok(stack)
    }
}

/// Shape of a stackline, carrying the optional arguments that shape defines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StackShape {
    /// `R`: round pad.
    Round {
        /// Drill diameter.
        drill: Option<f64>,
    },
    /// `S`: square pad.
    Square {
        /// Corner radius.
        corner_radius: Option<f64>,
        /// Drill diameter.
        drill: Option<f64>,
    },
    /// `A`: annular ring.
    Annular {
        /// Diameter of the copper-free centre.
        inner_diameter: Option<f64>,
        /// Drill diameter.
        drill: Option<f64>,
    },
    /// `O`: odd (user-defined) shape.
    Odd,
    /// `OF`: oval finger.
    OvalFinger {
        /// Finger rotation.
        rotation: Option<f64>,
        /// Finger length.
        length: Option<f64>,
        /// Finger offset.
        offset: Option<f64>,
    },
    /// `RF`: rectangular finger.
    RectangularFinger {
        /// Finger rotation.
        rotation: Option<f64>,
        /// Finger length.
        length: Option<f64>,
        /// Finger offset.
        offset: Option<f64>,
        /// Corner radius.
        corner_radius: Option<f64>,
        /// Drill diameter.
        drill: Option<f64>,
    },
}

impl StackShape {
    /// Decodes a shape code, reading its arguments from `fields`.
    fn parse(fields: &Fields<'_>) -> PadsResult<Self> {
        let code = fields.str(2, "shape")?;
        let arg = |index| fields.optional(index);
        let shape = match code {
            "R" => Self::Round { drill: arg(3) },
            "S" => Self::Square {
                corner_radius: arg(3),
                drill: arg(4),
            },
            "A" => Self::Annular {
                inner_diameter: arg(3),
                drill: arg(4),
            },
            "O" => Self::Odd,
            "OF" => Self::OvalFinger {
                rotation: arg(3),
                length: arg(4),
                offset: arg(5),
            },
            "RF" => Self::RectangularFinger {
                rotation: arg(3),
                length: arg(4),
                offset: arg(5),
                corner_radius: arg(6),
                drill: arg(7),
            },
            other => {
                return Err(PadsError::UnknownShape {
                    code: other.to_string(),
                })
            }
        };
        Ok(shape)
    }

    /// Human-readable shape name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Round { .. } => "Round",
            Self::Square { .. } => "Square",
            Self::Annular { .. } => "Annular",
            Self::Odd => "Odd",
            Self::OvalFinger { .. } => "OvalFinger",
            Self::RectangularFinger { .. } => "RectangularFinger",
        }
    }

    /// Drill diameter, for shapes that define one.
    #[must_use]
    pub const fn drill(&self) -> Option<f64> {
        match *self {
            Self::Round { drill }
            | Self::Square { drill, .. }
            | Self::Annular { drill, .. }
            | Self::RectangularFinger { drill, .. } => drill,
            Self::Odd | Self::OvalFinger { .. } => None,
        }
    }

    /// Number of arguments actually present.
    #[must_use]
    pub fn present_arguments(&self) -> usize {
        let args = match *self {
            Self::Round { drill } => [drill, None, None, None, None],
            Self::Square {
                corner_radius,
                drill,
            } => [corner_radius, drill, None, None, None],
            Self::Annular {
                inner_diameter,
                drill,
            } => [inner_diameter, drill, None, None, None],
            Self::Odd => [None; 5],
            Self::OvalFinger {
                rotation,
                length,
                offset,
            } => [rotation, length, offset, None, None],
            Self::RectangularFinger {
                rotation,
                length,
                offset,
                corner_radius,
                drill,
            } => [rotation, length, offset, corner_radius, drill],
        };
        args.iter().flatten().count()
    }
}

/// One layer of a padstack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLine {
    /// Layer code: [`LAYER_TOP`], [`LAYER_INNER`], [`LAYER_BOTTOM`] or a
    /// positive layer number.
    pub layer: i32,
    /// Nominal pad size.
    pub size: f64,
    /// Shape and its arguments.
    pub shape: StackShape,
}

impl StackLine {
    /// Parses `layer size shape [arguments…]`.
    ///
    /// # Errors
    ///
    /// Fails on a malformed layer or size, or an unknown shape code.
    pub fn parse(line: &str) -> PadsResult<Self> {
        let fields = Fields::new("stackline", line);
        Ok(Self {
            layer: fields.parse(0, "layer")?,
            size: fields.parse(1, "size")?,
            shape: StackShape::parse(&fields)?,
        })
    }

    /// A line with zero size and no arguments only fills the minimum
    /// three-line stack and describes no copper.
    #[must_use]
    pub fn is_useful(&self) -> bool {
        self.size != 0.0 || self.shape.present_arguments() > 0
    }
}
