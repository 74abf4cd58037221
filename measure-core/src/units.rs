//! Units of measure and length formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnitParseError;

/// Feet per metre.
pub const FEET_PER_METER: f64 = 3.28084;

/// Inches per metre.
pub const INCHES_PER_METER: f64 = 39.3701;

/// Display unit. Stored geometry is always metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Metres, two decimals.
    #[default]
    #[serde(alias = "m")]
    Meters,
    /// Feet, two decimals.
    #[serde(alias = "ft")]
    Feet,
    /// Inches, one decimal.
    #[serde(alias = "in")]
    Inches,
}

impl Unit {
    /// Every unit in toggle order.
    pub const ALL: [Self; 3] = [Self::Meters, Self::Feet, Self::Inches];

    /// Multiplier from metres to this unit.
    #[must_use]
    pub const fn per_meter(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Feet => FEET_PER_METER,
            Self::Inches => INCHES_PER_METER,
        }
    }

    /// Convert a length in metres to this unit.
    #[must_use]
    pub fn from_meters(self, meters: f64) -> f64 {
        meters * self.per_meter()
    }

    /// Convert a length in this unit back to metres.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        value / self.per_meter()
    }

    /// Decimal places used when formatting.
    #[must_use]
    pub const fn decimals(self) -> usize {
        match self {
            Self::Meters | Self::Feet => 2,
            Self::Inches => 1,
        }
    }

    /// Short suffix shown after a number.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Feet => "ft",
            Self::Inches => "in",
        }
    }

    /// Lowercase name, matching the serialised form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Feet => "feet",
            Self::Inches => "inches",
        }
    }

    /// Next unit in toggle order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Meters => Self::Feet,
            Self::Feet => Self::Inches,
            Self::Inches => Self::Meters,
        }
    }

    /// Format a length given in metres, e.g. `"9.84 ft"`.
    ///
    /// Rounds half away from zero at the unit's precision.
    ///
    /// # Example
    ///
    /// ```
    /// use measure_core::Unit;
    ///
    /// assert_eq!(Unit::Meters.format(0.125), "0.13 m");
    /// assert_eq!(Unit::Inches.format(1.0), "39.4 in");
    /// ```
    #[must_use]
    pub fn format(self, meters: f64) -> String {
        let decimals = self.decimals();
        let value = round_half_away(self.from_meters(meters), decimals);
        format!("{value:.decimals$} {}", self.symbol())
    }
}

/// Round to `decimals` places, ties away from zero. Never yields `-0`.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "ft" | "foot" | "feet" => Ok(Self::Feet),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            other => Err(UnitParseError(other.to_string())),
        }
    }
}
