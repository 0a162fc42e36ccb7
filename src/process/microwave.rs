//! Microwave: energy-based emission model.
//!
//! Same shape as the autoclave but with its own (higher) energy intensity and
//! a measurable NMVOC/PM10 release from the shredding stage.

use crate::data::factors::FactorTables;
use crate::domain::{EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

use super::{checked_total_kg, derived_record, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[Substance::Nmvoc, Substance::Pm10];

pub struct Microwave;

impl TreatmentProcess for Microwave {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Microwave
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

        let params = &tables.microwave;
        let co2_kg = total_kg
            * params.electricity_kwh_per_kg
            * params.grid_co2_per_kwh
            * scenario.multiplier_for(self.kind(), Substance::Co2Fossil);
        records.push(derived_record(self.kind(), Substance::Co2Fossil, co2_kg, Medium::Air)?);

        Ok(records)
    }
}
