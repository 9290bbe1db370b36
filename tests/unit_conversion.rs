//! Unit conversion and design synchronization tests.

use pads_ares_converter::ares::AresWriter;
use pads_ares_converter::pcb::{Design, Pad, PadShape, PadStyle, PcbLayer, Point, Trace};
use pads_ares_converter::units::{convert, Unit, UnitError};

/// Helper to compare floats with a relative tolerance.
fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_round_trip_between_all_units() {
    let values = [0.0, 1.0, -2.5, 60.0, 1234.5678, 1e6];
    for from in Unit::CONVERTIBLE {
        for to in Unit::CONVERTIBLE {
            for value in values {
                let there = convert(value, from, to).expect("Failed to convert");
                let back = convert(there, to, from).expect("Failed to convert back");
                assert!(
                    approx_eq(back, value, 1e-12),
                    "{value} {from:?} -> {to:?} -> {back}"
                );
            }
        }
    }
}

#[test]
fn test_known_factors() {
    assert!(approx_eq(convert(1.0, Unit::Inch, Unit::Thou).unwrap(), 1000.0, 1e-12));
    assert!(approx_eq(convert(1.0, Unit::Thou, Unit::TenNanometers).unwrap(), 2540.0, 1e-12));
    assert!(approx_eq(convert(25.4, Unit::Millimeter, Unit::Inch).unwrap(), 1.0, 1e-12));
    assert!(approx_eq(
        convert(3.0, Unit::TwoThirdsOfNanometer, Unit::TenNanometers).unwrap(),
        0.2,
        1e-12
    ));
}

#[test]
fn test_arbitrary_unit_is_not_convertible() {
    assert_eq!(
        convert(1.0, Unit::Arbitrary, Unit::Thou),
        Err(UnitError::NoMultiplier(Unit::Arbitrary))
    );
    assert_eq!(convert(7.0, Unit::Arbitrary, Unit::Arbitrary), Ok(7.0));
}

#[test]
fn test_prepare_brings_design_to_writer_units() {
    let mut design = Design::new(Unit::Millimeter);
    design.pads.push(Pad::new(
        "1",
        Unit::Millimeter,
        Point::new(1.0, -1.0),
        PcbLayer::Top,
        PadStyle::new(PadShape::CircularTh, Unit::Millimeter, 1.27, None, Some(0.635)),
    ));
    design.traces.push(Trace::new(
        PcbLayer::All,
        0.254,
        Unit::Millimeter,
        Unit::Millimeter,
        vec![Point::new(0.0, 0.0), Point::new(2.54, 0.0)],
    ));

    AresWriter::prepare(&mut design).expect("Failed to synchronize");

    assert_eq!(design.coordinate_units(), AresWriter::COORDINATE_UNITS);
    let pad = &design.pads[0];
    assert_eq!(pad.units(), AresWriter::DIMENSION_UNITS);
    assert!(approx_eq(pad.style.outer, 50.0, 1e-12));
    assert!(approx_eq(pad.style.drill.unwrap_or_default(), 25.0, 1e-12));
    assert!(approx_eq(pad.position.x, 100_000.0, 1e-12));
    assert!(approx_eq(pad.position.y, -100_000.0, 1e-12));

    let trace = &design.traces[0];
    assert!(approx_eq(trace.thickness, 10.0, 1e-12));
    assert!(approx_eq(trace.points[1].x, 254_000.0, 1e-12));
}
