//! Emission inventory aggregation.
//!
//! The aggregator folds direct and indirect records into one inventory per
//! (hospital, scenario) pair: an ordered mapping from (substance, medium) to
//! the summed amount in kilograms. Records sharing a key merge by summation,
//! never by overwrite. Unit reconciliation happens in a first pass over all
//! records — a record whose unit cannot be converted to kilograms fails the
//! aggregation rather than slipping through at merge time.
//!
//! An `Inventory` is terminal: it exposes no mutators once built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{EmissionRecord, Medium, Substance};
use crate::error::EngineError;

/// Flows with magnitude at or below this are dropped from the inventory.
const ZERO_FLOW_EPS_KG: f64 = 1e-15;

/// One aggregated flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowEntry {
    pub substance: Substance,
    pub medium: Medium,
    pub amount_kg: f64,
}

/// Aggregated emissions for one (hospital, scenario) execution, ordered by
/// (substance, medium).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    hospital_id: String,
    scenario: String,
    entries: Vec<FlowEntry>,
}

impl Inventory {
    pub fn hospital_id(&self) -> &str {
        &self.hospital_id
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn entries(&self) -> &[FlowEntry] {
        &self.entries
    }

    pub fn amount_of(&self, substance: Substance, medium: Medium) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.substance == substance && e.medium == medium)
            .map(|e| e.amount_kg)
    }

    /// Net mass across all flows (credits included).
    pub fn total_kg(&self) -> f64 {
        self.entries.iter().map(|e| e.amount_kg).sum()
    }
}

/// Merge direct and indirect records into a finalized inventory.
pub fn aggregate(
    hospital_id: &str,
    scenario: &str,
    direct: &[EmissionRecord],
    indirect: &[EmissionRecord],
) -> Result<Inventory, EngineError> {
    // Pass 1: reconcile every amount to kilograms.
    let mut reconciled: Vec<(Substance, Medium, f64)> = Vec::new();
    for record in direct.iter().chain(indirect) {
        let kg = record.amount.in_kilograms().map_err(|e| {
            EngineError::Aggregation(format!(
                "record {}/{} from '{}': {e}",
                record.substance, record.medium, record.source_process_id
            ))
        })?;
        reconciled.push((record.substance, record.medium, kg));
    }

    // Pass 2: merge by (substance, medium), summing amounts.
    let mut flows: BTreeMap<(Substance, Medium), f64> = BTreeMap::new();
    for (substance, medium, kg) in reconciled {
        *flows.entry((substance, medium)).or_insert(0.0) += kg;
    }

    let entries = flows
        .into_iter()
        .filter(|(_, kg)| kg.abs() > ZERO_FLOW_EPS_KG)
        .map(|((substance, medium), amount_kg)| FlowEntry {
            substance,
            medium,
            amount_kg,
        })
        .collect();

    Ok(Inventory {
        hospital_id: hospital_id.to_string(),
        scenario: scenario.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Quantity, Unit};

    fn rec(substance: Substance, medium: Medium, kg: f64, indirect: bool) -> EmissionRecord {
        EmissionRecord::new(
            substance,
            Quantity::kilograms(kg),
            medium,
            if indirect { "indirect:energy" } else { "incineration" },
            indirect,
        )
        .unwrap()
    }

    #[test]
    fn shared_keys_merge_by_summation() {
        let direct = vec![
            rec(Substance::Co2Fossil, Medium::Air, 100.0, false),
            rec(Substance::Co2Fossil, Medium::Air, 50.0, false),
        ];
        let indirect = vec![rec(Substance::Co2Fossil, Medium::Air, 25.0, true)];
        let inv = aggregate("H1", "BASELINE", &direct, &indirect).unwrap();
        assert_eq!(inv.entries().len(), 1);
        assert!((inv.amount_of(Substance::Co2Fossil, Medium::Air).unwrap() - 175.0).abs() < 1e-9);
    }

    #[test]
    fn media_are_kept_apart() {
        let direct = vec![
            rec(Substance::Hg, Medium::Air, 1.0, false),
            rec(Substance::Hg, Medium::Water, 2.0, false),
        ];
        let inv = aggregate("H1", "BASELINE", &direct, &[]).unwrap();
        assert_eq!(inv.entries().len(), 2);
        assert!((inv.amount_of(Substance::Hg, Medium::Water).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn entries_come_out_ordered() {
        let direct = vec![
            rec(Substance::Pb, Medium::Air, 1.0, false),
            rec(Substance::Co2Fossil, Medium::Air, 1.0, false),
            rec(Substance::Nox, Medium::Air, 1.0, false),
        ];
        let inv = aggregate("H1", "BASELINE", &direct, &[]).unwrap();
        let substances: Vec<_> = inv.entries().iter().map(|e| e.substance).collect();
        let mut sorted = substances.clone();
        sorted.sort();
        assert_eq!(substances, sorted);
    }

    #[test]
    fn non_mass_units_fail_aggregation() {
        let bad = EmissionRecord::new(
            Substance::Co2Fossil,
            Quantity::new(5.0, Unit::KilowattHour),
            Medium::Air,
            "incineration",
            false,
        )
        .unwrap();
        let err = aggregate("H1", "BASELINE", &[bad], &[]).unwrap_err();
        assert!(matches!(err, EngineError::Aggregation(_)));
    }

    #[test]
    fn sub_kilogram_units_are_reconciled() {
        let grams = EmissionRecord::new(
            Substance::Hg,
            Quantity::new(1500.0, Unit::Gram),
            Medium::Air,
            "incineration",
            false,
        )
        .unwrap();
        let kilos = rec(Substance::Hg, Medium::Air, 0.5, false);
        let inv = aggregate("H1", "BASELINE", &[grams, kilos], &[]).unwrap();
        assert!((inv.amount_of(Substance::Hg, Medium::Air).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn numerically_zero_flows_are_dropped() {
        let direct = vec![rec(Substance::Dioxin, Medium::Air, 0.0, false)];
        let inv = aggregate("H1", "BASELINE", &direct, &[]).unwrap();
        assert!(inv.entries().is_empty());
    }
}
