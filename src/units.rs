//! Linear units and conversion between them.
//!
//! Every unit is defined by its magnitude in a common reference unit of
//! 0.1 nm (one ångström). Converting a value multiplies by the source
//! magnitude and divides by the destination magnitude, so any pair of
//! declared units converts without an intermediate rounding step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for unit conversions.
pub type UnitResult<T> = Result<T, UnitError>;

/// Errors raised by unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The unit has no declared multiplier and cannot take part in a conversion.
    #[error("unit {0:?} has no conversion multiplier")]
    NoMultiplier(Unit),
}

/// A linear unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Thousandths of an inch (mils).
    Thou,
    /// Millimetres.
    Millimeter,
    /// Ten nanometres.
    TenNanometers,
    /// Inches.
    Inch,
    /// Two thirds of a nanometre (PADS "BASIC" database units).
    TwoThirdsOfNanometer,
    /// Dimensionless values (styles, ratios). Not convertible.
    Arbitrary,
}

impl Unit {
    /// Units that have a conversion multiplier.
    pub const CONVERTIBLE: [Self; 5] = [
        Self::Thou,
        Self::Millimeter,
        Self::TenNanometers,
        Self::Inch,
        Self::TwoThirdsOfNanometer,
    ];

    /// Magnitude of one of this unit in 0.1 nm.
    #[must_use]
    pub fn multiplier(self) -> Option<f64> {
        match self {
            Self::Thou => Some(254_000.0),
            Self::Millimeter => Some(10_000_000.0),
            Self::TenNanometers => Some(100.0),
            Self::Inch => Some(254_000_000.0),
            Self::TwoThirdsOfNanometer => Some(20.0 / 3.0),
            Self::Arbitrary => None,
        }
    }

    /// Factor that turns a value in `self` into a value in `to`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::NoMultiplier`] if either unit is not convertible.
    pub fn factor_to(self, to: Self) -> UnitResult<f64> {
        let from_mult = self.multiplier().ok_or(UnitError::NoMultiplier(self))?;
        let to_mult = to.multiplier().ok_or(UnitError::NoMultiplier(to))?;
        Ok(from_mult / to_mult)
    }
}

/// Converts `value` from one unit to another.
///
/// Converting a unit to itself returns the value unchanged, even for
/// [`Unit::Arbitrary`].
///
/// # Errors
///
/// Returns [`UnitError::NoMultiplier`] if a conversion between distinct
/// units involves a unit without a multiplier.
pub fn convert(value: f64, from: Unit, to: Unit) -> UnitResult<f64> {
    if from == to {
        return Ok(value);
    }
    let from_mult = from.multiplier().ok_or(UnitError::NoMultiplier(from))?;
    let to_mult = to.multiplier().ok_or(UnitError::NoMultiplier(to))?;
    Ok(value * from_mult / to_mult)
}
