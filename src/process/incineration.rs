//! Incineration: combustion-stoichiometry emission model.
//!
//! Amounts follow `basis mass x base factor x scenario multiplier` per
//! substance. CO2 is charged against the full routed mass; particulates, SO2
//! and biogenic CO2 against the organic fraction; Hg/Pb against the
//! heavy-metal fraction; dioxins against the chlorinated fraction. A plant
//! running below 0.95 combustion efficiency pays a particulate penalty.

use log::debug;

use crate::data::factors::FactorTables;
use crate::domain::{EmissionRecord, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

use super::{checked_total_kg, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[
    Substance::Co2Fossil,
    Substance::Co2Biogenic,
    Substance::So2,
    Substance::Nox,
    Substance::Nh3,
    Substance::Pm10,
    Substance::Pm25,
    Substance::Hg,
    Substance::Pb,
    Substance::Dioxin,
];

/// Threshold below which incomplete combustion inflates particulates.
const EFFICIENCY_PENALTY_THRESHOLD: f64 = 0.95;

pub struct Incineration;

impl TreatmentProcess for Incineration {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Incineration
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

        let efficiency = tables.incineration.combustion_efficiency;
        if efficiency < EFFICIENCY_PENALTY_THRESHOLD {
            let penalty = 1.0 + 2.0 * (EFFICIENCY_PENALTY_THRESHOLD - efficiency);
            for record in &mut records {
                if matches!(record.substance, Substance::Pm10 | Substance::Pm25) {
                    record.amount.value *= penalty;
                }
            }
        }

        debug!(
            "incineration: {} kg from {} -> {} records",
            total_kg,
            stream.hospital_id,
            records.len()
        );
        Ok(records)
    }
}
