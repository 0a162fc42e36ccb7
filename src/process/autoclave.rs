//! Autoclave: energy-based emission model.
//!
//! Steam sterilization emits essentially nothing at the stack; the footprint
//! is the electricity drawn per kg of waste, converted through the grid CO2
//! intensity, plus a trace NMVOC factor on the organic fraction.

use crate::data::factors::FactorTables;
use crate::domain::{EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

use super::{checked_total_kg, derived_record, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[Substance::Nmvoc];

pub struct Autoclave;

impl TreatmentProcess for Autoclave {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Autoclave
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

        let params = &tables.autoclave;
        let co2_kg = total_kg
            * params.electricity_kwh_per_kg
            * params.grid_co2_per_kwh
            * scenario.multiplier_for(self.kind(), Substance::Co2Fossil);
        records.push(derived_record(self.kind(), Substance::Co2Fossil, co2_kg, Medium::Air)?);

        Ok(records)
    }
}
