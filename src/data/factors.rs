//! Emission factor tables.
//!
//! One immutable [`FactorTables`] value is built once per run (built-in
//! defaults or an external JSON file) and passed by reference into every
//! calculation call. There is no process-wide mutable factor state.
//!
//! Two kinds of data live here:
//!
//! - per-substance factors (`kg emitted per kg of basis mass`), looked up by
//!   (process, substance) — a missing entry is a hard `MissingFactor` error
//! - per-process model constants (decay rates, reagent ratios, energy
//!   intensities) that the variant models combine with stream masses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

/// Which part of a stream's mass a factor multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorBasis {
    TotalMass,
    OrganicMass,
    HeavyMetalMass,
    ChlorinatedMass,
}

impl FactorBasis {
    /// Resolve the basis mass (kg) for a stream.
    pub fn mass_kg(self, stream: &WasteStream) -> Result<f64, EngineError> {
        match self {
            FactorBasis::TotalMass => Ok(stream.total_mass()?.value),
            FactorBasis::OrganicMass => stream.organic_mass_kg(),
            FactorBasis::HeavyMetalMass => stream.heavy_metal_mass_kg(),
            FactorBasis::ChlorinatedMass => stream.chlorinated_mass_kg(),
        }
    }
}

/// A single base emission factor: kg of substance per kg of basis mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub value: f64,
    pub basis: FactorBasis,
    pub medium: Medium,
}

impl EmissionFactor {
    fn new(value: f64, basis: FactorBasis, medium: Medium) -> Self {
        Self { value, basis, medium }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncinerationParams {
    /// Dimensionless; below 0.95 a particulate penalty applies.
    pub combustion_efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandfillParams {
    /// Years of gas generation covered by the inventory.
    pub time_horizon_years: f64,
    /// yr^-1, rapidly degradable pool.
    pub fast_decay_rate: f64,
    /// yr^-1, slowly degradable pool.
    pub slow_decay_rate: f64,
    /// Share of organics in the fast pool.
    pub fast_pool_share: f64,
    /// kg landfill gas generated per kg organic fully decayed.
    pub gas_yield_per_kg_organic: f64,
    /// CH4 share of generated gas; the rest leaves as CO2 (biogenic).
    pub ch4_split: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PyrolysisParams {
    /// kWh of recovered syngas energy per kg routed mass.
    pub syngas_recovery_kwh_per_kg: f64,
    /// kg CO2 per kWh displaced on the grid.
    pub grid_co2_per_kwh: f64,
    /// Lower bound (kg, negative) for the recovery credit record.
    pub co2_credit_floor_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChemicalParams {
    /// kg reagent dosed per kg waste.
    pub disinfectant_ratio: f64,
    /// Share of dosed chlorine escaping to air.
    pub chlorine_loss: f64,
    /// Of the escaped chlorine, share leaving as HCl (rest as Cl2).
    pub chlorine_to_hcl_split: f64,
    /// Nitrogen mass fraction of the treated waste.
    pub nitrogen_content: f64,
    /// Share of that nitrogen volatilized as NH3.
    pub nitrogen_to_nh3: f64,
    /// Share of dosed reagent discharged unreacted to water.
    pub residual_discharge_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalParams {
    pub electricity_kwh_per_kg: f64,
    pub grid_co2_per_kwh: f64,
}

/// All emission factors and model constants, immutable for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTables {
    pub emissions: BTreeMap<ProcessKind, BTreeMap<Substance, EmissionFactor>>,
    pub incineration: IncinerationParams,
    pub landfill: LandfillParams,
    pub pyrolysis: PyrolysisParams,
    pub chemical: ChemicalParams,
    pub autoclave: ThermalParams,
    pub microwave: ThermalParams,
}

impl FactorTables {
    /// Base factor for a (process, substance) pair.
    pub fn factor(
        &self,
        process: ProcessKind,
        substance: Substance,
    ) -> Result<&EmissionFactor, EngineError> {
        self.emissions
            .get(&process)
            .and_then(|table| table.get(&substance))
            .ok_or(EngineError::MissingFactor { process, substance })
    }

    pub fn has_factor(&self, process: ProcessKind, substance: Substance) -> bool {
        self.emissions
            .get(&process)
            .is_some_and(|table| table.contains_key(&substance))
    }

    /// Base factor value with the scenario multiplier applied.
    pub fn effective_value(
        &self,
        process: ProcessKind,
        substance: Substance,
        scenario: &ScenarioConfig,
    ) -> Result<f64, EngineError> {
        let factor = self.factor(process, substance)?;
        Ok(factor.value * scenario.multiplier_for(process, substance))
    }

    /// Internal-consistency check, run once before a batch.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (process, table) in &self.emissions {
            for (substance, factor) in table {
                if !factor.value.is_finite() || factor.value < 0.0 {
                    return Err(EngineError::Config(format!(
                        "negative base factor {} for {process}/{substance}",
                        factor.value
                    )));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.incineration.combustion_efficiency) {
            return Err(EngineError::Config(
                "combustion efficiency outside [0, 1]".into(),
            ));
        }
        let lf = &self.landfill;
        if lf.time_horizon_years <= 0.0
            || lf.fast_decay_rate <= 0.0
            || lf.slow_decay_rate <= 0.0
            || !(0.0..=1.0).contains(&lf.fast_pool_share)
            || !(0.0..=1.0).contains(&lf.ch4_split)
        {
            return Err(EngineError::Config("invalid landfill decay parameters".into()));
        }
        if self.pyrolysis.co2_credit_floor_kg > 0.0 {
            return Err(EngineError::Config(
                "pyrolysis credit floor must be non-positive".into(),
            ));
        }
        Ok(())
    }

    /// Built-in factor set.
    pub fn builtin() -> Self {
        use FactorBasis::{ChlorinatedMass, HeavyMetalMass, OrganicMass, TotalMass};
        use Medium::{Air, Water};
        use Substance::*;

        let mut emissions = BTreeMap::new();

        emissions.insert(
            ProcessKind::Incineration,
            BTreeMap::from([
                (Co2Fossil, EmissionFactor::new(1.2, TotalMass, Air)), // kg CO2 / kg waste
                (Co2Biogenic, EmissionFactor::new(1.05, OrganicMass, Air)),
                (So2, EmissionFactor::new(3.4e-4, OrganicMass, Air)),
                (Nox, EmissionFactor::new(4.3e-6, TotalMass, Air)),
                (Nh3, EmissionFactor::new(9.1e-6, TotalMass, Air)),
                (Pm10, EmissionFactor::new(3.1e-5, OrganicMass, Air)),
                (Pm25, EmissionFactor::new(2.17e-5, OrganicMass, Air)),
                (Hg, EmissionFactor::new(4.65e-5, HeavyMetalMass, Air)),
                (Pb, EmissionFactor::new(6.218e-4, HeavyMetalMass, Air)),
                (Dioxin, EmissionFactor::new(2.3e-12, ChlorinatedMass, Air)), // kg I-TEQ
            ]),
        );

        emissions.insert(
            ProcessKind::Landfill,
            BTreeMap::from([
                (Nh3, EmissionFactor::new(9.1e-6, TotalMass, Air)),
                (Nmvoc, EmissionFactor::new(1.7e-3, TotalMass, Air)),
                // Leachate pathway.
                (Hg, EmissionFactor::new(3.3e-5, HeavyMetalMass, Water)),
                (Pb, EmissionFactor::new(1.9e-4, HeavyMetalMass, Water)),
            ]),
        );

        emissions.insert(
            ProcessKind::Pyrolysis,
            BTreeMap::from([
                (Co2Fossil, EmissionFactor::new(6.887e-2, OrganicMass, Air)),
                (Ch4Fossil, EmissionFactor::new(4.0e-3, OrganicMass, Air)),
                (Nmvoc, EmissionFactor::new(6.45e-4, OrganicMass, Air)),
                (Pahs, EmissionFactor::new(1.79e-4, OrganicMass, Air)),
                (Dioxin, EmissionFactor::new(3.71e-13, ChlorinatedMass, Air)),
                (Hg, EmissionFactor::new(8.6e-7, HeavyMetalMass, Air)),
                (Pb, EmissionFactor::new(4.5e-7, HeavyMetalMass, Air)),
            ]),
        );

        emissions.insert(
            ProcessKind::ChemicalDisinfection,
            BTreeMap::from([
                (Nmvoc, EmissionFactor::new(8.51e-7, OrganicMass, Air)),
                (Pm10, EmissionFactor::new(2.0e-10, OrganicMass, Air)),
            ]),
        );

        emissions.insert(
            ProcessKind::Autoclave,
            BTreeMap::from([(Nmvoc, EmissionFactor::new(8.81e-6, OrganicMass, Air))]),
        );

        emissions.insert(
            ProcessKind::Microwave,
            BTreeMap::from([
                (Nmvoc, EmissionFactor::new(2.46e-5, OrganicMass, Air)),
                (Pm10, EmissionFactor::new(1.476e-5, OrganicMass, Air)),
            ]),
        );

        Self {
            emissions,
            incineration: IncinerationParams {
                combustion_efficiency: 0.97,
            },
            landfill: LandfillParams {
                time_horizon_years: 100.0,
                fast_decay_rate: 0.18,
                slow_decay_rate: 0.02,
                fast_pool_share: 0.5,
                gas_yield_per_kg_organic: 0.45,
                ch4_split: 0.5,
            },
            pyrolysis: PyrolysisParams {
                syngas_recovery_kwh_per_kg: 0.85,
                grid_co2_per_kwh: 0.4,
                co2_credit_floor_kg: -1.0e6,
            },
            chemical: ChemicalParams {
                disinfectant_ratio: 0.03,
                chlorine_loss: 0.05,
                chlorine_to_hcl_split: 0.6,
                nitrogen_content: 0.03,
                nitrogen_to_nh3: 0.2,
                residual_discharge_ratio: 0.02,
            },
            autoclave: ThermalParams {
                electricity_kwh_per_kg: 0.35,
                grid_co2_per_kwh: 0.4,
            },
            microwave: ThermalParams {
                electricity_kwh_per_kg: 0.7,
                grid_co2_per_kwh: 0.4,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scenarios;

    #[test]
    fn builtin_tables_validate() {
        FactorTables::builtin().validate().unwrap();
    }

    #[test]
    fn missing_factor_is_an_error_not_zero() {
        let tables = FactorTables::builtin();
        let err = tables
            .factor(ProcessKind::Autoclave, Substance::Dioxin)
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingFactor { .. }));
    }

    #[test]
    fn effective_value_applies_scenario_multiplier() {
        let tables = FactorTables::builtin();
        let mut scenario = scenarios::baseline();
        scenario.factor_multipliers.push(crate::domain::FactorMultiplier {
            process: ProcessKind::Incineration,
            substance: Substance::Co2Fossil,
            value: 0.5,
        });
        let base = tables
            .factor(ProcessKind::Incineration, Substance::Co2Fossil)
            .unwrap()
            .value;
        let effective = tables
            .effective_value(ProcessKind::Incineration, Substance::Co2Fossil, &scenario)
            .unwrap();
        assert!((effective - base * 0.5).abs() < 1e-12);
    }
}
