//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during emission calculation
//! - exported to JSON/CSV
//! - reloaded later for comparisons across scenario runs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::units::{Quantity, Unit};

/// Waste categories a hospital stream is sorted into.
///
/// `General` doubles as the mixed/contamination sink: mass missorted out of
/// every other category ends up here during segregation adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    General,
    Infectious,
    Sharps,
    Pharmaceutical,
    Chemical,
    HeavyMetals,
    Radioactive,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 7] = [
        WasteCategory::General,
        WasteCategory::Infectious,
        WasteCategory::Sharps,
        WasteCategory::Pharmaceutical,
        WasteCategory::Chemical,
        WasteCategory::HeavyMetals,
        WasteCategory::Radioactive,
    ];

    /// Categories whose mass counts toward the degradable/combustible
    /// organic fraction.
    pub fn is_organic(self) -> bool {
        matches!(
            self,
            WasteCategory::General
                | WasteCategory::Infectious
                | WasteCategory::Pharmaceutical
                | WasteCategory::Chemical
        )
    }

    /// Categories carrying halogenated material (dioxin precursors).
    pub fn is_chlorinated(self) -> bool {
        matches!(self, WasteCategory::Pharmaceutical | WasteCategory::Chemical)
    }

    pub fn label(self) -> &'static str {
        match self {
            WasteCategory::General => "general",
            WasteCategory::Infectious => "infectious",
            WasteCategory::Sharps => "sharps",
            WasteCategory::Pharmaceutical => "pharmaceutical",
            WasteCategory::Chemical => "chemical",
            WasteCategory::HeavyMetals => "heavy_metals",
            WasteCategory::Radioactive => "radioactive",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inventory substances.
///
/// The canonical dimension for every substance is mass (kg); GWP-style
/// equivalence is applied downstream by the impact-scoring backend, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substance {
    Co2Fossil,
    Co2Biogenic,
    Ch4Fossil,
    Nox,
    So2,
    Pm10,
    Pm25,
    Hg,
    Pb,
    Dioxin,
    Pahs,
    Nmvoc,
    Nh3,
    Hcl,
    Cl2,
}

impl Substance {
    pub fn label(self) -> &'static str {
        match self {
            Substance::Co2Fossil => "co2_fossil",
            Substance::Co2Biogenic => "co2_biogenic",
            Substance::Ch4Fossil => "ch4_fossil",
            Substance::Nox => "nox",
            Substance::So2 => "so2",
            Substance::Pm10 => "pm10",
            Substance::Pm25 => "pm25",
            Substance::Hg => "hg",
            Substance::Pb => "pb",
            Substance::Dioxin => "dioxin",
            Substance::Pahs => "pahs",
            Substance::Nmvoc => "nmvoc",
            Substance::Nh3 => "nh3",
            Substance::Hcl => "hcl",
            Substance::Cl2 => "cl2",
        }
    }
}

impl std::fmt::Display for Substance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Release compartment of an emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Air,
    Water,
    Soil,
}

impl std::fmt::Display for Medium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Medium::Air => "air",
            Medium::Water => "water",
            Medium::Soil => "soil",
        };
        f.write_str(s)
    }
}

/// The closed set of treatment technologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Incineration,
    Landfill,
    Pyrolysis,
    ChemicalDisinfection,
    Autoclave,
    Microwave,
}

impl ProcessKind {
    pub const ALL: [ProcessKind; 6] = [
        ProcessKind::Incineration,
        ProcessKind::Landfill,
        ProcessKind::Pyrolysis,
        ProcessKind::ChemicalDisinfection,
        ProcessKind::Autoclave,
        ProcessKind::Microwave,
    ];

    /// Identifier used in `EmissionRecord::source_process_id`.
    pub fn id(self) -> &'static str {
        match self {
            ProcessKind::Incineration => "incineration",
            ProcessKind::Landfill => "landfill",
            ProcessKind::Pyrolysis => "pyrolysis",
            ProcessKind::ChemicalDisinfection => "chem_disinfection",
            ProcessKind::Autoclave => "autoclave",
            ProcessKind::Microwave => "microwave",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ProcessKind::Incineration => "Incineration",
            ProcessKind::Landfill => "Landfill",
            ProcessKind::Pyrolysis => "Pyrolysis",
            ProcessKind::ChemicalDisinfection => "Chemical Disinfection",
            ProcessKind::Autoclave => "Autoclave",
            ProcessKind::Microwave => "Microwave",
        }
    }
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A hospital waste stream routed to one treatment process.
///
/// Composition masses carry their own units; all mass arithmetic goes through
/// the unit layer. A stream is created per (hospital, scenario) execution,
/// mutated only by [`WasteStream::adjust_for_segregation`], and discarded
/// after emission calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteStream {
    pub hospital_id: String,
    pub composition: BTreeMap<WasteCategory, Quantity>,
    /// Fraction in [0, 1] describing how well categories are kept separate.
    pub segregation_efficiency: f64,
    pub assigned_process: ProcessKind,
}

impl WasteStream {
    pub fn new(
        hospital_id: impl Into<String>,
        composition: BTreeMap<WasteCategory, Quantity>,
        segregation_efficiency: f64,
        assigned_process: ProcessKind,
    ) -> Self {
        Self {
            hospital_id: hospital_id.into(),
            composition,
            segregation_efficiency,
            assigned_process,
        }
    }

    /// Total stream mass in kilograms.
    pub fn total_mass(&self) -> Result<Quantity, EngineError> {
        Ok(Quantity::kilograms(self.mass_of(|_| true)?))
    }

    /// Summed mass (kg) of the categories selected by `pred`.
    pub fn mass_of(&self, pred: impl Fn(WasteCategory) -> bool) -> Result<f64, EngineError> {
        let mut sum = 0.0;
        for (category, mass) in &self.composition {
            if pred(*category) {
                sum += mass.in_kilograms()?;
            }
        }
        Ok(sum)
    }

    pub fn organic_mass_kg(&self) -> Result<f64, EngineError> {
        self.mass_of(WasteCategory::is_organic)
    }

    pub fn chlorinated_mass_kg(&self) -> Result<f64, EngineError> {
        self.mass_of(WasteCategory::is_chlorinated)
    }

    pub fn heavy_metal_mass_kg(&self) -> Result<f64, EngineError> {
        self.mass_of(|c| c == WasteCategory::HeavyMetals)
    }

    /// Redistribute missorted mass into the `General` sink.
    ///
    /// For every category except `General`, a fraction `(1 - efficiency)` of
    /// its mass is reassigned to `General` within this stream. Total mass is
    /// conserved exactly; only the split between categories changes. The sink
    /// itself is never debited.
    pub fn adjust_for_segregation(&mut self, efficiency: f64) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(EngineError::Config(format!(
                "segregation efficiency {efficiency} outside [0, 1]"
            )));
        }

        let mut moved_kg = 0.0;
        for (category, mass) in self.composition.iter_mut() {
            if *category == WasteCategory::General {
                continue;
            }
            let kg = mass.in_kilograms()?;
            let moved = kg * (1.0 - efficiency);
            moved_kg += moved;
            *mass = Quantity::new(
                crate::units::convert(kg - moved, Unit::Kilogram, mass.unit)?,
                mass.unit,
            );
        }

        if moved_kg > 0.0 {
            let sink_kg = self
                .composition
                .get(&WasteCategory::General)
                .map(|q| q.in_kilograms())
                .transpose()?
                .unwrap_or(0.0);
            self.composition.insert(
                WasteCategory::General,
                Quantity::kilograms(sink_kg + moved_kg),
            );
        }
        self.segregation_efficiency = efficiency;
        Ok(())
    }
}

/// One substance flow produced by a treatment process or the indirect
/// calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub substance: Substance,
    pub amount: Quantity,
    pub medium: Medium,
    pub source_process_id: String,
    pub is_indirect: bool,
}

impl EmissionRecord {
    /// Construct a record, rejecting negative amounts.
    pub fn new(
        substance: Substance,
        amount: Quantity,
        medium: Medium,
        source_process_id: impl Into<String>,
        is_indirect: bool,
    ) -> Result<Self, EngineError> {
        if !amount.value.is_finite() || amount.value < 0.0 {
            return Err(EngineError::Config(format!(
                "invalid emission amount {} for {substance}",
                amount.value
            )));
        }
        Ok(Self {
            substance,
            amount,
            medium,
            source_process_id: source_process_id.into(),
            is_indirect,
        })
    }

    /// Construct an energy-recovery offset record.
    ///
    /// Offsets are the only records allowed to be negative, and only down to
    /// the configured floor.
    pub fn offset(
        substance: Substance,
        amount: Quantity,
        medium: Medium,
        source_process_id: impl Into<String>,
        floor_kg: f64,
    ) -> Result<Self, EngineError> {
        let kg = amount.in_kilograms()?;
        if !kg.is_finite() || kg < floor_kg {
            return Err(EngineError::Config(format!(
                "recovery offset {kg} kg for {substance} below configured floor {floor_kg} kg"
            )));
        }
        Ok(Self {
            substance,
            amount,
            medium,
            source_process_id: source_process_id.into(),
            is_indirect: false,
        })
    }

}

/// One scenario multiplier on a (process, substance) base factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorMultiplier {
    pub process: ProcessKind,
    pub substance: Substance,
    pub value: f64,
}

/// A named bundle of overrides applied before calculation.
///
/// Immutable once loaded; validation happens eagerly in
/// `data::scenarios::validate_scenario` before any stream processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    /// Replacement for the hospital's default segregation efficiency.
    pub segregation_override: Option<f64>,
    pub factor_multipliers: Vec<FactorMultiplier>,
    pub indirect_enabled: bool,
    /// Which process treats each waste category. Must be total.
    pub routing: BTreeMap<WasteCategory, ProcessKind>,
}

impl ScenarioConfig {
    /// Combined multiplier for a (process, substance) pair.
    ///
    /// Entries sharing a key compose multiplicatively, so two equivalent
    /// configs applied in sequence equal one config with the product.
    pub fn multiplier_for(&self, process: ProcessKind, substance: Substance) -> f64 {
        self.factor_multipliers
            .iter()
            .filter(|m| m.process == process && m.substance == substance)
            .map(|m| m.value)
            .product()
    }
}

/// Facility-specific factors for indirect emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalProfile {
    pub hospital_id: String,
    /// Total waste generated per year, kg.
    pub annual_waste_kg: f64,
    /// Default segregation efficiency when no scenario override applies.
    pub segregation_efficiency: f64,
    /// Mass fractions per category; must sum to 1.
    pub composition: BTreeMap<WasteCategory, f64>,
    pub energy: EnergyInputs,
    pub transport: Transportation,
    pub infrastructure: Infrastructure,
    pub downstream: Downstream,
}

/// Grid electricity drawn per kg of waste handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyInputs {
    pub energy_use_kwh_per_kg: f64,
    pub co2_fossil_per_kwh: f64,
    pub so2_per_kwh: f64,
    pub pm25_per_kwh: f64,
}

/// Collection transport from wards to the treatment site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transportation {
    pub distance_km: f64,
    pub truck_load_t: f64,
    pub co2_fossil_per_tkm: f64,
    pub nox_per_tkm: f64,
}

/// Amortized construction burden of the treatment facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infrastructure {
    pub construction_co2_per_kg: f64,
}

/// Residue handling after treatment (ash/sludge transport and disposal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Downstream {
    pub residue_ratio: f64,
    pub residue_co2_per_kg: f64,
    pub residue_so2_per_kg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(masses: &[(WasteCategory, f64)]) -> WasteStream {
        let composition = masses
            .iter()
            .map(|(c, kg)| (*c, Quantity::kilograms(*kg)))
            .collect();
        WasteStream::new("H1", composition, 0.55, ProcessKind::Incineration)
    }

    #[test]
    fn segregation_conserves_total_mass() {
        let mut s = stream(&[
            (WasteCategory::General, 650.0),
            (WasteCategory::Infectious, 180.0),
            (WasteCategory::Sharps, 40.0),
            (WasteCategory::Chemical, 55.0),
        ]);
        let before = s.total_mass().unwrap().value;
        s.adjust_for_segregation(0.7).unwrap();
        let after = s.total_mass().unwrap().value;
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn segregation_moves_missorted_mass_to_general() {
        let mut s = stream(&[
            (WasteCategory::General, 100.0),
            (WasteCategory::Infectious, 50.0),
        ]);
        s.adjust_for_segregation(0.8).unwrap();
        let general = s.composition[&WasteCategory::General].in_kilograms().unwrap();
        let infectious = s.composition[&WasteCategory::Infectious].in_kilograms().unwrap();
        assert!((general - 110.0).abs() < 1e-9);
        assert!((infectious - 40.0).abs() < 1e-9);
    }

    #[test]
    fn segregation_handles_mixed_units() {
        let mut s = stream(&[(WasteCategory::General, 0.0)]);
        s.composition
            .insert(WasteCategory::Sharps, Quantity::new(0.05, Unit::Tonne));
        let before = s.total_mass().unwrap().value;
        s.adjust_for_segregation(0.5).unwrap();
        assert!((s.total_mass().unwrap().value - before).abs() < 1e-9);
        let sharps = s.composition[&WasteCategory::Sharps];
        assert_eq!(sharps.unit, Unit::Tonne);
        assert!((sharps.in_kilograms().unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn segregation_rejects_out_of_range_efficiency() {
        let mut s = stream(&[(WasteCategory::General, 10.0)]);
        assert!(matches!(
            s.adjust_for_segregation(1.2),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            s.adjust_for_segregation(f64::NAN),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn record_rejects_negative_amount() {
        let err = EmissionRecord::new(
            Substance::Nox,
            Quantity::kilograms(-0.1),
            Medium::Air,
            "incineration",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn offset_record_respects_floor() {
        let ok = EmissionRecord::offset(
            Substance::Co2Fossil,
            Quantity::kilograms(-500.0),
            Medium::Air,
            "pyrolysis",
            -1000.0,
        );
        assert!(ok.is_ok());
        let err = EmissionRecord::offset(
            Substance::Co2Fossil,
            Quantity::kilograms(-2000.0),
            Medium::Air,
            "pyrolysis",
            -1000.0,
        );
        assert!(err.is_err());
    }

    #[test]
    fn multipliers_compose_multiplicatively() {
        let scenario = ScenarioConfig {
            name: "X".into(),
            segregation_override: None,
            factor_multipliers: vec![
                FactorMultiplier {
                    process: ProcessKind::Incineration,
                    substance: Substance::Co2Fossil,
                    value: 0.5,
                },
                FactorMultiplier {
                    process: ProcessKind::Incineration,
                    substance: Substance::Co2Fossil,
                    value: 0.5,
                },
            ],
            indirect_enabled: true,
            routing: BTreeMap::new(),
        };
        let m = scenario.multiplier_for(ProcessKind::Incineration, Substance::Co2Fossil);
        assert!((m - 0.25).abs() < 1e-12);
        assert!(
            (scenario.multiplier_for(ProcessKind::Landfill, Substance::Co2Fossil) - 1.0).abs()
                < 1e-12
        );
    }
}
