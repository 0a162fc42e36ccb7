//! Pyrolysis: thermal decomposition with energy recovery.
//!
//! Combustion-type factors sit well below incineration because the reaction
//! runs oxygen-starved. Recovered syngas energy displaces grid electricity;
//! the displacement is booked as a negative CO2-fossil record, bounded below
//! by the configured floor.

use log::debug;

use crate::data::factors::FactorTables;
use crate::domain::{EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;
use crate::units::Quantity;

use super::{checked_total_kg, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[
    Substance::Co2Fossil,
    Substance::Ch4Fossil,
    Substance::Nmvoc,
    Substance::Pahs,
    Substance::Dioxin,
    Substance::Hg,
    Substance::Pb,
];

pub struct Pyrolysis;

impl TreatmentProcess for Pyrolysis {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Pyrolysis
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

        // Energy-recovery credit. Not subject to emission multipliers: it is
        // a displacement on the grid side, not a process emission factor.
        let params = &tables.pyrolysis;
        let credit_kg = -(total_kg * params.syngas_recovery_kwh_per_kg * params.grid_co2_per_kwh);
        records.push(EmissionRecord::offset(
            Substance::Co2Fossil,
            Quantity::kilograms(credit_kg),
            Medium::Air,
            self.kind().id(),
            params.co2_credit_floor_kg,
        )?);

        debug!(
            "pyrolysis: {} kg, energy credit {} kg CO2",
            total_kg, credit_kg
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scenarios;
    use crate::domain::WasteCategory;
    use std::collections::BTreeMap;

    fn stream(kg: f64) -> WasteStream {
        let composition: BTreeMap<_, _> =
            [(WasteCategory::General, Quantity::kilograms(kg))].into();
        WasteStream::new("H1", composition, 0.5, ProcessKind::Pyrolysis)
    }

    #[test]
    fn recovery_credit_is_negative_and_floored() {
        let tables = FactorTables::builtin();
        let scenario = scenarios::baseline();
        let records = Pyrolysis
            .compute_direct_emissions(&stream(1000.0), &tables, &scenario)
            .unwrap();

        let credits: Vec<_> = records.iter().filter(|r| r.amount.value < 0.0).collect();
        assert_eq!(credits.len(), 1);
        let credit = credits[0];
        assert_eq!(credit.substance, Substance::Co2Fossil);
        assert!((credit.amount.value - (-1000.0 * 0.85 * 0.4)).abs() < 1e-9);
        assert!(credit.amount.value >= tables.pyrolysis.co2_credit_floor_kg);

        // Everything else is non-negative.
        assert!(records
            .iter()
            .filter(|r| r.amount.value >= 0.0)
            .count() == records.len() - 1);
    }

    #[test]
    fn credit_below_floor_is_an_error() {
        let mut tables = FactorTables::builtin();
        tables.pyrolysis.co2_credit_floor_kg = -10.0;
        let scenario = scenarios::baseline();
        let err = Pyrolysis
            .compute_direct_emissions(&stream(1000.0), &tables, &scenario)
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn organic_factors_sit_below_incineration() {
        let tables = FactorTables::builtin();
        let pyr = tables
            .factor(ProcessKind::Pyrolysis, Substance::Co2Fossil)
            .unwrap()
            .value;
        let inc = tables
            .factor(ProcessKind::Incineration, Substance::Co2Fossil)
            .unwrap()
            .value;
        assert!(pyr < inc);
    }
}
