//! Unit handling for waste masses and emission amounts.
//!
//! Quantities enter the engine with heterogeneous units (hospital returns in
//! tonnes, factors quoted per kg or per kWh), so conversion has to be
//! explicit rather than assumed. The rest of the crate never multiplies raw
//! magnitudes across units; it routes everything through [`convert`] or
//! [`Quantity::convert_to`], which reject cross-dimension conversions with
//! `EngineError::UnitMismatch`.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Energy,
    Distance,
}

/// Units the engine understands.
///
/// Each dimension has a reference unit (kg, kWh, km) that conversion factors
/// are expressed against. Emission inventories are always reconciled to
/// kilograms before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "t")]
    Tonne,
    #[serde(rename = "wh")]
    WattHour,
    #[serde(rename = "kwh")]
    KilowattHour,
    #[serde(rename = "mj")]
    Megajoule,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "km")]
    Kilometer,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Tonne => Dimension::Mass,
            Unit::WattHour | Unit::KilowattHour | Unit::Megajoule => Dimension::Energy,
            Unit::Meter | Unit::Kilometer => Dimension::Distance,
        }
    }

    /// Multiplier taking one of this unit to the dimension's reference unit.
    fn reference_factor(self) -> f64 {
        match self {
            Unit::Gram => 1e-3,
            Unit::Kilogram => 1.0,
            Unit::Tonne => 1e3,
            Unit::WattHour => 1e-3,
            Unit::KilowattHour => 1.0,
            // 1 kWh = 3.6 MJ
            Unit::Megajoule => 1.0 / 3.6,
            Unit::Meter => 1e-3,
            Unit::Kilometer => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Tonne => "t",
            Unit::WattHour => "Wh",
            Unit::KilowattHour => "kWh",
            Unit::Megajoule => "MJ",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Convert `amount` from one unit to another.
///
/// Fails with `UnitMismatch` when the dimensions differ; there is no implicit
/// mass/energy bridging anywhere in the engine.
pub fn convert(amount: f64, from: Unit, to: Unit) -> Result<f64, EngineError> {
    if from.dimension() != to.dimension() {
        return Err(EngineError::UnitMismatch { from, to });
    }
    Ok(amount * from.reference_factor() / to.reference_factor())
}

/// A magnitude tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn kilograms(value: f64) -> Self {
        Self::new(value, Unit::Kilogram)
    }

    pub fn convert_to(self, unit: Unit) -> Result<Quantity, EngineError> {
        Ok(Quantity::new(convert(self.value, self.unit, unit)?, unit))
    }

    /// Magnitude in kilograms; errors for non-mass quantities.
    pub fn in_kilograms(self) -> Result<f64, EngineError> {
        convert(self.value, self.unit, Unit::Kilogram)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
