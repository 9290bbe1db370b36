//! Turns decoded decal records into design geometry.
//!
//! Pieces become graphics or traces directly. Pads need a padstack bound to
//! each terminal, then one of three outcomes:
//!
//! - a drill-only hole when a stackline's drill is at least its pad size,
//! - a single pad on every layer when the stack covers exactly the
//!   configured "all layers" pattern,
//! - otherwise one pad per useful stackline, with inner-layer lines copied
//!   to both internal layers.

use std::collections::BTreeSet;

use super::error::{PadsError, PadsResult};
use super::partdecal::{
    PadStack, Partdecal, Piece, PieceKind, StackLine, StackShape, Terminal, LAYER_BOTTOM,
    LAYER_INNER, LAYER_TOP,
};
use super::ParserOptions;
use crate::diagnostics::{Diagnostics, Fault, FaultCategory};
use crate::pcb::{
    Design, Graphics, GraphicsLayer, LineType, Pad, PadShape, PadStyle, PcbLayer, SilkLine, Trace,
};
use crate::units::Unit;

/// Copper piece layer number meaning "every layer".
const PIECE_LAYER_ALL: i32 = 0;

/// Graphics layer of a piece layer number.
const fn graphics_layer(layer: i32) -> Option<GraphicsLayer> {
    match layer {
        26 => Some(GraphicsLayer::TopSilk),
        27 => Some(GraphicsLayer::BottomSilk),
        20 => Some(GraphicsLayer::Other),
        _ => None,
    }
}

/// Line type of a piece line style code.
///
/// Codes 3 (dash-dot) and 4 (dash-dot-dot) have no equivalent.
const fn line_type(code: i32) -> Option<LineType> {
    match code {
        0 => Some(LineType::Solid),
        1 => Some(LineType::Dashed),
        2 => Some(LineType::Dotted),
        _ => None,
    }
}

/// Adds the geometry of `decal` to `design`.
///
/// Every coordinate and dimension is tagged with `units`, the file header's
/// unit. The decal's own `I`/`M` token does not scale its values.
pub fn add_decal(
    design: &mut Design,
    decal: &Partdecal,
    units: Unit,
    options: &ParserOptions,
    diagnostics: &mut Diagnostics,
) {
    add_pieces(design, decal, units, diagnostics);
    add_pads(design, decal, units, options, diagnostics);
}

fn add_pieces(
    design: &mut Design,
    decal: &Partdecal,
    units: Unit,
    diagnostics: &mut Diagnostics,
) {
    for piece in &decal.pieces {
        match piece.kind {
            PieceKind::Open | PieceKind::Closed => {
                design.graphics.push(polyline(piece, units, diagnostics));
            }
            PieceKind::Copper => {
                if piece.points.len() < 2 {
                    diagnostics.push(
                        FaultCategory::MalformedField,
                        format!(
                            "Copper piece on layer {} has {} point(s), at least 2 needed",
                            piece.layer,
                            piece.points.len()
                        ),
                    );
                    continue;
                }
                let layer = if piece.layer == PIECE_LAYER_ALL {
                    PcbLayer::All
                } else {
                    PcbLayer::Extended(piece.layer)
                };
                design.traces.push(Trace::new(
                    layer,
                    piece.width,
                    units,
                    units,
                    piece.points.clone(),
                ));
            }
        }
    }
}

fn polyline(piece: &Piece, units: Unit, diagnostics: &mut Diagnostics) -> Graphics {
    let layer = graphics_layer(piece.layer).unwrap_or_else(|| {
        diagnostics.push(
            FaultCategory::UnsupportedLayer,
            format!("Default graphics layer used instead of #{}", piece.layer),
        );
        GraphicsLayer::TopSilk
    });
    let line_type = line_type(piece.line_style).unwrap_or_else(|| {
        diagnostics.push(
            FaultCategory::UnsupportedLineStyle,
            format!("Default line type used instead of {}", piece.line_style),
        );
        LineType::Solid
    });

    let mut graphics = Graphics::new(units, units, layer);
    graphics.lines = piece
        .points
        .windows(2)
        .map(|pair| SilkLine::new(pair[0], pair[1], units, units, piece.width, line_type))
        .collect();
    graphics
}

/// Binds a terminal to a padstack: by designator or index (whichever the
/// options prefer first, then the other), then the all-terminals padstack.
fn find_padstack<'a>(
    decal: &'a Partdecal,
    terminal: &Terminal,
    prefer_index: bool,
) -> Option<&'a PadStack> {
    let index = terminal.index.to_string();
    let (first, second) = if prefer_index {
        (index.as_str(), terminal.designator.as_str())
    } else {
        (terminal.designator.as_str(), index.as_str())
    };
    let by_key = |key: &str| decal.padstacks.iter().find(|stack| stack.designator == key);

    by_key(first)
        .or_else(|| by_key(second))
        .or_else(|| by_key(PadStack::ALL_TERMINALS))
}

fn add_pads(
    design: &mut Design,
    decal: &Partdecal,
    units: Unit,
    options: &ParserOptions,
    diagnostics: &mut Diagnostics,
) {
    let all_layers: BTreeSet<i32> = options.layer_model.all_layer_pattern().iter().copied().collect();

    for terminal in &decal.terminals {
        let Some(padstack) =
            find_padstack(decal, terminal, options.prioritize_padstack_binding_by_index)
        else {
            diagnostics.push(
                FaultCategory::MissingPadstack,
                format!(
                    "Can't find a suitable padstack for the terminal #{}",
                    terminal.designator
                ),
            );
            continue;
        };
        let new_pad = |layer, style| {
            Pad::new(terminal.designator.clone(), units, terminal.position, layer, style)
        };

        let drill_hole = padstack.lines.iter().find_map(|line| {
            line.shape.drill().filter(|&drill| drill >= line.size)
        });
        if let Some(drill) = drill_hole {
            tracing::debug!(pin = %terminal.designator, drill, "Drill-only hole");
            let style = PadStyle::new(PadShape::CircularTh, units, drill, None, Some(drill));
            design.pads.push(new_pad(PcbLayer::Drill, style));
            continue;
        }

        let useful: Vec<&StackLine> = padstack.lines.iter().filter(|l| l.is_useful()).collect();

        if useful.len() == 3 {
            let mut layers = all_layers.clone();
            layers.extend(useful.iter().map(|line| line.layer));
            if layers.len() == 3 {
                // Drill and other arguments usually sit on one layer only.
                let mut richest = useful[0];
                for &line in &useful[1..] {
                    if line.shape.present_arguments() > richest.shape.present_arguments() {
                        richest = line;
                    }
                }
                tracing::debug!(pin = %terminal.designator, "Padstack covers all layers");
                match pad_style(richest, units, diagnostics) {
                    Ok(style) => design.pads.push(new_pad(PcbLayer::All, style)),
                    Err(e) => record_stackline_error(diagnostics, terminal, &e),
                }
                continue;
            }
        }

        for line in useful {
            let style = match pad_style(line, units, diagnostics) {
                Ok(style) => style,
                Err(e) => {
                    record_stackline_error(diagnostics, terminal, &e);
                    continue;
                }
            };
            let layer = pad_layer(line.layer, diagnostics);
            // A stackline cannot tell the two internal faces apart.
            if layer == PcbLayer::InternalBottom {
                design.pads.push(new_pad(layer, style.clone()));
                design.pads.push(new_pad(PcbLayer::InternalTop, style));
            } else {
                design.pads.push(new_pad(layer, style));
            }
        }
    }
}

fn record_stackline_error(diagnostics: &mut Diagnostics, terminal: &Terminal, error: &PadsError) {
    diagnostics.push(
        error.category(),
        format!("Terminal #{}: {error}", terminal.designator),
    );
}

/// Pad style of one stackline.
///
/// Rectangular fingers keep only their length; rotation, offset and corner
/// radius are dropped and a lossy-approximation diagnostic is recorded.
fn pad_style(line: &StackLine, units: Unit, diagnostics: &mut Diagnostics) -> PadsResult<PadStyle> {
    let style = match line.shape {
        // A round pad with a drill is a plated hole, not an annulus.
        StackShape::Round { drill } => {
            let shape = if drill.is_some() {
                PadShape::CircularTh
            } else {
                PadShape::CircularSmt
            };
            PadStyle::new(shape, units, line.size, None, drill)
        }
        StackShape::Square { drill, .. } => {
            let shape = if drill.is_some() {
                PadShape::RectangularTh
            } else {
                PadShape::RectangularSmt
            };
            PadStyle::new(shape, units, line.size, Some(line.size), drill)
        }
        StackShape::Annular {
            inner_diameter,
            drill,
        } => {
            let inner = inner_diameter.ok_or(PadsError::MissingArgument {
                shape: line.shape.name(),
                argument: "internal diameter",
            })?;
            let shape = if drill.is_some() {
                PadShape::CircularTh
            } else {
                PadShape::CircularSmt
            };
            PadStyle::new(shape, units, line.size, Some(inner), drill)
        }
        StackShape::RectangularFinger { length, .. } => {
            let length = length.ok_or(PadsError::MissingArgument {
                shape: line.shape.name(),
                argument: "finger length",
            })?;
            diagnostics.push(
                FaultCategory::LossyApproximation,
                "Only Length argument is supported for RectangularFinger pad style",
            );
            PadStyle::new(PadShape::RectangularSmt, units, line.size, Some(length), None)
        }
        StackShape::Odd | StackShape::OvalFinger { .. } => {
            return Err(PadsError::UnsupportedShape {
                shape: line.shape.name(),
            })
        }
    };
    Ok(style)
}

/// Design layer of a stackline layer code.
fn pad_layer(code: i32, diagnostics: &mut Diagnostics) -> PcbLayer {
    match code {
        LAYER_TOP => PcbLayer::Top,
        // Resolved to both internal layers by the caller.
        LAYER_INNER => PcbLayer::InternalBottom,
        LAYER_BOTTOM => PcbLayer::Bottom,
        other => {
            diagnostics.push(
                FaultCategory::UnsupportedLayer,
                format!("Padstack layer {other} is only partially supported"),
            );
            PcbLayer::Extended(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pads::LayerModel;
    use crate::pcb::Point;

    fn stack(designator: &str, lines: &[&str]) -> PadStack {
        PadStack {
            designator: designator.to_string(),
            lines: lines.iter().map(|l| StackLine::parse(l).unwrap()).collect(),
        }
    }

    fn terminal(designator: &str, index: usize) -> Terminal {
        Terminal {
            position: Point::new(10.0, 20.0),
            number_position: Point::new(0.0, 0.0),
            designator: designator.to_string(),
            index,
        }
    }

    fn decal(terminals: Vec<Terminal>, padstacks: Vec<PadStack>) -> Partdecal {
        Partdecal {
            name: "TEST".into(),
            units: Unit::Thou,
            pieces: Vec::new(),
            terminals,
            padstacks,
        }
    }

    fn resolve(decal: &Partdecal, options: &ParserOptions) -> (Design, Diagnostics) {
        let mut design = Design::new(Unit::Thou);
        let mut diagnostics = Diagnostics::new();
        add_decal(&mut design, decal, Unit::Thou, options, &mut diagnostics);
        (design, diagnostics)
    }

    #[test]
    fn drill_only_hole() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 40 R 40", "-1 0 R", "0 0 R"])],
        );
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 1);
        let pad = &design.pads[0];
        assert_eq!(pad.layer, PcbLayer::Drill);
        assert_eq!(pad.style.shape, PadShape::CircularTh);
        assert_eq!(pad.style.outer, 40.0);
        assert_eq!(pad.style.inner, None);
        assert_eq!(pad.style.drill, Some(40.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn all_layer_collapse_prefers_richest_line() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 60 R", "-1 60 R", "0 60 R 35"])],
        );
        let (design, _) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 1);
        assert_eq!(design.pads[0].layer, PcbLayer::All);
        assert_eq!(design.pads[0].style.shape, PadShape::CircularTh);
        assert_eq!(design.pads[0].style.drill, Some(35.0));
    }

    #[test]
    fn all_layer_collapse_tie_keeps_first() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 60 S", "-1 70 R", "0 80 R"])],
        );
        let (design, _) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 1);
        assert_eq!(design.pads[0].style.shape, PadShape::RectangularSmt);
        assert_eq!(design.pads[0].style.outer, 60.0);
    }

    #[test]
    fn inner_layer_yields_both_internal_pads() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 60 R", "-1 50 R", "0 0 R"])],
        );
        let (design, _) = resolve(&decal, &ParserOptions::default());

        let layers: Vec<_> = design.pads.iter().map(|p| p.layer).collect();
        assert_eq!(
            layers,
            [PcbLayer::Top, PcbLayer::InternalBottom, PcbLayer::InternalTop]
        );
        assert_eq!(design.pads[1].style, design.pads[2].style);
        assert_eq!(design.pads[1].position, design.pads[2].position);
    }

    #[test]
    fn binding_falls_back_to_index_then_wildcard() {
        let decal = decal(
            vec![terminal("A", 2), terminal("B", 7)],
            vec![
                stack("2", &["-2 10 R", "-1 0 R", "0 0 R"]),
                stack("0", &["-2 20 R", "-1 0 R", "0 0 R"]),
            ],
        );
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 2);
        assert_eq!(design.pads[0].style.outer, 10.0);
        assert_eq!(design.pads[1].style.outer, 20.0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn index_priority_binding() {
        let decal = decal(
            vec![terminal("2", 1)],
            vec![
                stack("2", &["-2 10 R", "-1 0 R", "0 0 R"]),
                stack("1", &["-2 30 R", "-1 0 R", "0 0 R"]),
            ],
        );
        let options = ParserOptions {
            prioritize_padstack_binding_by_index: true,
            ..ParserOptions::default()
        };
        let (design, _) = resolve(&decal, &options);
        assert_eq!(design.pads[0].style.outer, 30.0);

        let (design, _) = resolve(&decal, &ParserOptions::default());
        assert_eq!(design.pads[0].style.outer, 10.0);
    }

    #[test]
    fn unbound_terminal_is_skipped() {
        let decal = decal(
            vec![terminal("5", 3), terminal("1", 2)],
            vec![stack("1", &["-2 10 R", "-1 0 R", "0 0 R"])],
        );
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 1);
        assert_eq!(design.pads[0].designator, "1");
        assert_eq!(diagnostics.count(FaultCategory::MissingPadstack), 1);
    }

    #[test]
    fn annular_and_finger_styles() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 70 A 40", "0 20 RF 90 80 5"])],
        );
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 2);
        assert_eq!(design.pads[0].style.shape, PadShape::CircularSmt);
        assert_eq!(design.pads[0].style.inner, Some(40.0));
        assert_eq!(design.pads[1].layer, PcbLayer::Bottom);
        assert_eq!(design.pads[1].style.shape, PadShape::RectangularSmt);
        assert_eq!(design.pads[1].style.inner, Some(80.0));
        assert_eq!(diagnostics.count(FaultCategory::LossyApproximation), 1);
    }

    #[test]
    fn unsupported_shape_skips_only_its_line() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 60 O", "0 60 R"])],
        );
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads.len(), 1);
        assert_eq!(design.pads[0].layer, PcbLayer::Bottom);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count(FaultCategory::UnsupportedShape), 1);
    }

    #[test]
    fn positive_layer_is_extended() {
        let decal = decal(vec![terminal("1", 1)], vec![stack("1", &["3 60 R"])]);
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.pads[0].layer, PcbLayer::Extended(3));
        assert_eq!(diagnostics.count(FaultCategory::UnsupportedLayer), 1);
    }

    #[test]
    fn custom_layer_model_disables_default_collapse() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 60 R", "-1 60 R", "0 60 R"])],
        );
        let options = ParserOptions {
            layer_model: LayerModel::Custom {
                layers: vec![-2, -1, 0, 1, 2],
                all_layer_override: false,
            },
            ..ParserOptions::default()
        };
        let (design, _) = resolve(&decal, &options);
        assert_eq!(design.pads.len(), 4);

        let options = ParserOptions {
            layer_model: LayerModel::Custom {
                layers: vec![-2, -1, 0, 1, 2],
                all_layer_override: true,
            },
            ..ParserOptions::default()
        };
        let (design, _) = resolve(&decal, &options);
        assert_eq!(design.pads.len(), 1);
    }

    #[test]
    fn pieces_become_graphics_and_traces() {
        let mut decal = decal(Vec::new(), Vec::new());
        decal.pieces = vec![
            Piece {
                kind: PieceKind::Closed,
                layer: 27,
                width: 8.0,
                line_style: 1,
                pin: None,
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                ],
            },
            Piece {
                kind: PieceKind::Open,
                layer: 99,
                width: 8.0,
                line_style: 4,
                pin: None,
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            },
            Piece {
                kind: PieceKind::Copper,
                layer: 0,
                width: 12.0,
                line_style: 0,
                pin: None,
                points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            },
        ];
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert_eq!(design.graphics.len(), 2);
        assert_eq!(design.graphics[0].layer, GraphicsLayer::BottomSilk);
        assert_eq!(design.graphics[0].lines.len(), 2);
        assert_eq!(design.graphics[0].lines[0].line_type, LineType::Dashed);
        assert_eq!(design.graphics[1].layer, GraphicsLayer::TopSilk);
        assert_eq!(design.graphics[1].lines[0].line_type, LineType::Solid);
        assert_eq!(design.traces.len(), 1);
        assert_eq!(design.traces[0].layer, PcbLayer::All);
        assert_eq!(diagnostics.count(FaultCategory::UnsupportedLayer), 1);
        assert_eq!(diagnostics.count(FaultCategory::UnsupportedLineStyle), 1);
    }

    #[test]
    fn single_point_copper_is_dropped() {
        let mut decal = decal(Vec::new(), Vec::new());
        decal.pieces = vec![Piece {
            kind: PieceKind::Copper,
            layer: 1,
            width: 10.0,
            line_style: 0,
            pin: None,
            points: vec![Point::new(3.0, 4.0)],
        }];
        let (design, diagnostics) = resolve(&decal, &ParserOptions::default());

        assert!(design.traces.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count(FaultCategory::MalformedField), 1);
    }

    #[test]
    fn geometry_takes_header_units_not_decal_units() {
        let decal = decal(
            vec![terminal("1", 1)],
            vec![stack("1", &["-2 1 R", "0 0 R"])],
        );
        assert_eq!(decal.units, Unit::Thou);

        let mut design = Design::new(Unit::Millimeter);
        let mut diagnostics = Diagnostics::new();
        add_decal(
            &mut design,
            &decal,
            Unit::Millimeter,
            &ParserOptions::default(),
            &mut diagnostics,
        );

        assert_eq!(design.pads.len(), 1);
        assert_eq!(design.pads[0].units(), Unit::Millimeter);
        assert_eq!(design.pads[0].coordinate_units(), Unit::Millimeter);
        assert_eq!(design.pads[0].style.outer, 1.0);
    }
}
