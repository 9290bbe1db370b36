//! PADS ASCII (PowerPCB) reader.
//!
//! Only the first decal of the `*PARTDECAL*` section is decoded; every
//! other section is located and then ignored.
//!
//! # File Structure
//!
//! ```text
//! !PADS-POWERPCB-V9.0-MILS! DESIGN DATABASE ASCII FILE 1.0
//! *PCB*        GENERAL PARAMETERS OF THE PCB DESIGN
//! …
//! *PARTDECAL*  ITEMS
//!
//! R0805 I 0 0 2 2 1 0 0           decal header
//! …                               pieces, terminals, padstacks
//! *END*
//! ```
//!
//! The unit token at the end of the file header (`MILS`, `METRIC`, `BASIC`,
//! `INCHES`) gives the design's coordinate unit. Section bodies start after
//! their marker line and run up to the next recorded section.

mod error;
mod partdecal;
mod resolve;

use serde::Deserialize;

pub use error::{PadsError, PadsResult};
pub use partdecal::{
    PadStack, Partdecal, Piece, PieceKind, StackLine, StackShape, Terminal, LAYER_BOTTOM,
    LAYER_INNER, LAYER_TOP,
};

use crate::diagnostics::Diagnostics;
use crate::pcb::Design;
use crate::units::Unit;

/// File header unit tokens.
const HEADER_UNITS: [(Unit, &str); 4] = [
    (Unit::Thou, "MILS"),
    (Unit::Millimeter, "METRIC"),
    (Unit::TwoThirdsOfNanometer, "BASIC"),
    (Unit::Inch, "INCHES"),
];

const FILE_HEADER_DESIGNATOR: u8 = b'!';
const FILE_HEADER_SEPARATOR: u8 = b'-';
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Stackline layer codes that mean "every layer" in the four-layer model.
const FOUR_LAYER_PATTERN: [i32; 3] = [LAYER_TOP, LAYER_INNER, LAYER_BOTTOM];

/// Which padstack layer codes make up "all layers".
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum LayerModel {
    /// Top, inner and bottom (`-2`, `-1`, `0`).
    #[default]
    FourLayer,
    /// A board-specific list of layer codes.
    Custom {
        /// Layer codes that together mean "all layers".
        layers: Vec<i32>,
        /// Still recognize `-2`, `-1`, `0` as "all layers".
        #[serde(default)]
        all_layer_override: bool,
    },
}

impl LayerModel {
    /// Layer codes whose union with a three-line padstack must stay at three
    /// codes for the padstack to collapse to a single all-layer pad.
    #[must_use]
    pub fn all_layer_pattern(&self) -> &[i32] {
        match self {
            Self::FourLayer
            | Self::Custom {
                all_layer_override: true,
                ..
            } => &FOUR_LAYER_PATTERN,
            Self::Custom { layers, .. } => layers,
        }
    }
}

/// Reader switches, fixed for the duration of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Decal pieces use the LINES-section header layout
    /// (`type count width style layer`). Some library generators emit this.
    pub piece_header_compatibility: bool,

    /// Layer model for recognizing all-layer padstacks.
    pub layer_model: LayerModel,

    /// Bind padstacks by terminal index before pin designator.
    pub prioritize_padstack_binding_by_index: bool,
}

/// Sections of a PADS ASCII file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Cluster,
    Conn,
    End,
    Get,
    Jumper,
    Lines,
    Misc,
    Net,
    Part,
    Partdecal,
    Parttype,
    Pcb,
    Pour,
    Remark,
    Reuse,
    Route,
    Signal,
    Standard,
    Testpoint,
    Text,
    Via,
}

impl Section {
    /// Every section, in marker search order.
    pub const ALL: [Self; 21] = [
        Self::Cluster,
        Self::Conn,
        Self::End,
        Self::Get,
        Self::Jumper,
        Self::Lines,
        Self::Misc,
        Self::Net,
        Self::Part,
        Self::Partdecal,
        Self::Parttype,
        Self::Pcb,
        Self::Pour,
        Self::Remark,
        Self::Reuse,
        Self::Route,
        Self::Signal,
        Self::Standard,
        Self::Testpoint,
        Self::Text,
        Self::Via,
    ];

    /// Marker that opens the section.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Cluster => "*CLUSTER*",
            Self::Conn => "*CONN*",
            Self::End => "*END*",
            Self::Get => "*GET*",
            Self::Jumper => "*JUMPER*",
            Self::Lines => "*LINES*",
            Self::Misc => "*MISC*",
            Self::Net => "*NET*",
            Self::Part => "*PART*",
            Self::Partdecal => "*PARTDECAL*",
            Self::Parttype => "*PARTTYPE*",
            Self::Pcb => "*PCB*",
            Self::Pour => "*POUR*",
            Self::Remark => "*REMARK*",
            Self::Reuse => "*REUSE*",
            Self::Route => "*ROUTE*",
            Self::Signal => "*SIGNAL*",
            Self::Standard => "*STANDARD*",
            Self::Testpoint => "*TESTPOINT*",
            Self::Text => "*TEXT*",
            Self::Via => "*VIA*",
        }
    }
}

/// Body start offsets of the sections found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    starts: Vec<(Section, usize)>,
    len: usize,
}

impl SectionIndex {
    /// Locates every section marker at or after byte offset `from`.
    ///
    /// A body starts on the line after its marker. One blank line is
    /// skipped, as is a stray `\r\n` some exporters leave behind.
    #[must_use]
    pub fn build(contents: &str, from: usize) -> Self {
        let bytes = contents.as_bytes();
        let len = bytes.len();
        let mut starts = Vec::new();

        for section in Section::ALL {
            let Some(found) = contents.get(from..).and_then(|rest| rest.find(section.marker()))
            else {
                continue;
            };
            let marker_at = from + found;
            let mut start = contents[marker_at..]
                .find('\n')
                .map_or(len, |pos| marker_at + pos + 1);
            if bytes.get(start) == Some(&b'\n') {
                start += 1;
            }
            if bytes.get(start) == Some(&b'\r') {
                start += 1;
                if bytes.get(start) == Some(&b'\n') {
                    start += 1;
                }
            }
            tracing::trace!(?section, start, "Found section");
            starts.push((section, start));
        }

        Self { starts, len }
    }

    /// Body start of `section`, if present.
    #[must_use]
    pub fn start(&self, section: Section) -> Option<usize> {
        self.starts
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, start)| *start)
    }

    /// Byte range of `section`'s body: up to the nearest other section start
    /// after it, or the end of the document.
    #[must_use]
    pub fn range(&self, section: Section) -> Option<std::ops::Range<usize>> {
        let start = self.start(section)?;
        let end = self
            .starts
            .iter()
            .map(|(_, other)| *other)
            .filter(|&other| other > start)
            .min()
            .unwrap_or(self.len);
        Some(start..end)
    }

    /// Sections found, in search order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.starts.iter().map(|(section, _)| *section)
    }
}

/// Reads the design unit from the `!…-UNITS!` file header.
///
/// Returns the unit and the offset of the first line after the header.
///
/// # Errors
///
/// Fails if the header delimiters are missing or the token is unknown.
pub fn parse_file_header(contents: &str) -> PadsResult<(Unit, usize)> {
    // A byte order mark the caller did not strip.
    let open = if contents.starts_with(BYTE_ORDER_MARK) {
        BYTE_ORDER_MARK.len_utf8()
    } else {
        0
    };
    let bytes = contents.as_bytes();
    let close = bytes
        .iter()
        .skip(open + 1)
        .position(|&b| b == FILE_HEADER_DESIGNATOR)
        .map(|pos| pos + open + 1)
        .ok_or(PadsError::MissingFileHeader)?;
    let token_start = bytes[..close]
        .iter()
        .rposition(|&b| b == FILE_HEADER_SEPARATOR)
        .map(|pos| pos + 1)
        .ok_or(PadsError::MissingFileHeader)?;
    let token = &contents[token_start..close];

    let units = HEADER_UNITS
        .iter()
        .find(|(_, t)| *t == token)
        .map(|(unit, _)| *unit)
        .ok_or_else(|| PadsError::UnknownFileUnits {
            token: token.to_string(),
        })?;

    let body = contents[close..]
        .find('\n')
        .map_or(contents.len(), |pos| close + pos + 1);
    Ok((units, body))
}

/// PADS ASCII reader.
#[derive(Debug, Clone, Default)]
pub struct PadsReader {
    options: ParserOptions,
}

impl PadsReader {
    /// Creates a reader with the given switches.
    #[must_use]
    pub const fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Reader switches.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Decodes a PADS ASCII document.
    ///
    /// Coordinates and dimensions of the returned design are in the file
    /// header's unit. The decal's `I`/`M` token is validated and logged but
    /// does not rescale anything. A missing or blank PARTDECAL section yields
    /// an empty design.
    ///
    /// # Errors
    ///
    /// Fails on a malformed file header, an unknown unit token, or a
    /// malformed decal header. Faults in individual records are recorded in
    /// `diagnostics` instead.
    pub fn read(&self, contents: &str, diagnostics: &mut Diagnostics) -> PadsResult<Design> {
        let (units, body) = parse_file_header(contents)?;
        let sections = SectionIndex::build(contents, body);
        tracing::debug!(
            ?units,
            sections = ?sections.sections().collect::<Vec<_>>(),
            "Indexed PADS document"
        );

        let mut design = Design::new(units);

        let decal = match sections.range(Section::Partdecal) {
            Some(range) => Partdecal::parse(&contents[range], &self.options, diagnostics)?,
            None => None,
        };
        match decal {
            Some(decal) => {
                tracing::info!(
                    name = %decal.name,
                    terminals = decal.terminals.len(),
                    padstacks = decal.padstacks.len(),
                    pieces = decal.pieces.len(),
                    "Read decal"
                );
                if decal.units != units {
                    tracing::debug!(
                        decal_units = ?decal.units,
                        header_units = ?units,
                        "Decal unit token differs from the file header, header wins"
                    );
                }
                resolve::add_decal(&mut design, &decal, units, &self.options, diagnostics);
            }
            None => tracing::info!("No PARTDECAL data, design is empty"),
        }

        design.synchronize_coordinate_units(units)?;
        Ok(design)
    }
}
