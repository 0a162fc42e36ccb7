//! Chemical disinfection: reagent-stoichiometry emission model.
//!
//! Emissions are tied to the chlorine-based reagent dose per kg of waste.
//! Dosed chlorine partly escapes to air (split between HCl and Cl2), treated
//! nitrogen partly volatilizes as NH3, and unreacted reagent is discharged to
//! water as a separate residual record.

use crate::data::factors::FactorTables;
use crate::domain::{EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteStream};
use crate::error::EngineError;

use super::{checked_total_kg, derived_record, records_from_table, TreatmentProcess};

const TABLE_SUBSTANCES: &[Substance] = &[Substance::Nmvoc, Substance::Pm10];

// Molar mass ratios for the stoichiometric conversions.
const HCL_PER_CL: f64 = 36.46 / 35.45;
const NH3_PER_N: f64 = 17.031 / 14.007;

pub struct ChemicalDisinfection;

impl TreatmentProcess for ChemicalDisinfection {
    fn kind(&self) -> ProcessKind {
        ProcessKind::ChemicalDisinfection
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

        let params = &tables.chemical;
        let kind = self.kind();
        let reagent_kg = total_kg * params.disinfectant_ratio;
        let chlorine_air_kg = reagent_kg * params.chlorine_loss;

        let hcl_kg = chlorine_air_kg
            * params.chlorine_to_hcl_split
            * HCL_PER_CL
            * scenario.multiplier_for(kind, Substance::Hcl);
        let cl2_kg = chlorine_air_kg
            * (1.0 - params.chlorine_to_hcl_split)
            * scenario.multiplier_for(kind, Substance::Cl2);
        let nh3_kg = total_kg
            * params.nitrogen_content
            * params.nitrogen_to_nh3
            * NH3_PER_N
            * scenario.multiplier_for(kind, Substance::Nh3);
        // Residual reagent leaves with the wastewater, not the flue path.
        let residual_kg =
            reagent_kg * params.residual_discharge_ratio * scenario.multiplier_for(kind, Substance::Cl2);

        records.push(derived_record(kind, Substance::Hcl, hcl_kg, Medium::Air)?);
        records.push(derived_record(kind, Substance::Cl2, cl2_kg, Medium::Air)?);
        records.push(derived_record(kind, Substance::Nh3, nh3_kg, Medium::Air)?);
        records.push(derived_record(kind, Substance::Cl2, residual_kg, Medium::Water)?);

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scenarios;
    use crate::domain::WasteCategory;
    use crate::units::Quantity;
    use std::collections::BTreeMap;

    fn stream(kg: f64) -> WasteStream {
        let composition: BTreeMap<_, _> =
            [(WasteCategory::Infectious, Quantity::kilograms(kg))].into();
        WasteStream::new("H1", composition, 0.5, ProcessKind::ChemicalDisinfection)
    }

    #[test]
    fn reagent_stoichiometry() {
        let tables = FactorTables::builtin();
        let scenario = scenarios::baseline();
        let records = ChemicalDisinfection
            .compute_direct_emissions(&stream(1000.0), &tables, &scenario)
            .unwrap();

        // 1000 kg x 0.03 dose x 0.05 loss = 1.5 kg chlorine to air.
        let hcl = records
            .iter()
            .find(|r| r.substance == Substance::Hcl)
            .unwrap();
        assert!((hcl.amount.value - 1.5 * 0.6 * HCL_PER_CL).abs() < 1e-9);

        let cl2_air = records
            .iter()
            .find(|r| r.substance == Substance::Cl2 && r.medium == Medium::Air)
            .unwrap();
        assert!((cl2_air.amount.value - 1.5 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn residual_reagent_is_a_separate_water_record() {
        let tables = FactorTables::builtin();
        let scenario = scenarios::baseline();
        let records = ChemicalDisinfection
            .compute_direct_emissions(&stream(1000.0), &tables, &scenario)
            .unwrap();
        let residual = records
            .iter()
            .find(|r| r.substance == Substance::Cl2 && r.medium == Medium::Water)
            .unwrap();
        // 30 kg reagent x 0.02 unreacted.
        assert!((residual.amount.value - 0.6).abs() < 1e-9);
    }

    #[test]
    fn pharmaceutical_waste_is_rejected() {
        let tables = FactorTables::builtin();
        let scenario = scenarios::baseline();
        let composition: BTreeMap<_, _> =
            [(WasteCategory::Pharmaceutical, Quantity::kilograms(5.0))].into();
        let s = WasteStream::new("H1", composition, 0.5, ProcessKind::ChemicalDisinfection);
        assert!(matches!(
            ChemicalDisinfection.compute_direct_emissions(&s, &tables, &scenario),
            Err(EngineError::UnsupportedCategory { .. })
        ));
    }
}
