//! Landfill: degradation-based emission model.
//!
//! Gas generation follows two first-order decay pools (rapidly and slowly
//! degradable organics) integrated over the configured time horizon; the
//! generated gas splits into CH4 and biogenic CO2. Leachate carries Hg/Pb to
//! water via the factor table.

use log::debug;

use crate::data::factors::{FactorTables, LandfillParams};
use crate::domain::{EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

use super::{checked_total_kg, derived_record, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[
    Substance::Nh3,
    Substance::Nmvoc,
    Substance::Hg,
    Substance::Pb,
];

/// Fraction of the gas potential released within the time horizon.
fn decayed_fraction(params: &LandfillParams) -> f64 {
    let fast = 1.0 - (-params.fast_decay_rate * params.time_horizon_years).exp();
    let slow = 1.0 - (-params.slow_decay_rate * params.time_horizon_years).exp();
    params.fast_pool_share * fast + (1.0 - params.fast_pool_share) * slow
}

pub struct Landfill;

impl TreatmentProcess for Landfill {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Landfill
    }

    fn compute_direct_emissions(
        &self,
        stream: &WasteStream,
        tables: &FactorTables,
        scenario: &ScenarioConfig,
    ) -> Result<Vec<EmissionRecord>, EngineError> {
        let Some(total_kg) = checked_total_kg(self.kind(), stream)? else {
            return Ok(Vec::new());
        };

        let mut records =
            records_from_table(self.kind(), TABLE_SUBSTANCES, stream, tables, scenario)?;

        let params = &tables.landfill;
        let gas_kg =
            stream.organic_mass_kg()? * params.gas_yield_per_kg_organic * decayed_fraction(params);
        let ch4_kg = gas_kg
            * params.ch4_split
            * scenario.multiplier_for(self.kind(), Substance::Ch4Fossil);
        let co2_kg = gas_kg
            * (1.0 - params.ch4_split)
            * scenario.multiplier_for(self.kind(), Substance::Co2Biogenic);

        records.push(derived_record(self.kind(), Substance::Ch4Fossil, ch4_kg, Medium::Air)?);
        records.push(derived_record(self.kind(), Substance::Co2Biogenic, co2_kg, Medium::Air)?);

        debug!(
            "landfill: {} kg buried, {} kg gas over {} years",
            total_kg, gas_kg, params.time_horizon_years
        );
        Ok(records)
    }
}
