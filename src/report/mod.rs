//! Reporting utilities: flow rankings and formatted terminal output.

use crate::app::pipeline::PairOutput;
use crate::error::EngineError;
use crate::inventory::{FlowEntry, Inventory};

mod format;

pub use format::{format_batch_summary, format_scenarios};

/// Top flows of an inventory by absolute amount.
pub fn rank_flows(inventory: &Inventory, top_n: usize) -> Vec<FlowEntry> {
    let mut entries = inventory.entries().to_vec();
    entries.sort_by(|a, b| {
        b.amount_kg
            .abs()
            .partial_cmp(&a.amount_kg.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(top_n);
    entries
}

/// Summed direct and indirect masses (kg) of a pair's records.
pub fn direct_indirect_split(output: &PairOutput) -> Result<(f64, f64), EngineError> {
    let mut direct = 0.0;
    for record in &output.direct {
        direct += record.amount.in_kilograms()?;
    }
    let mut indirect = 0.0;
    for record in &output.indirect {
        indirect += record.amount.in_kilograms()?;
    }
    Ok((direct, indirect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmissionRecord, Medium, Substance};
    use crate::inventory::aggregate;
    use crate::units::Quantity;

    #[test]
    fn ranking_orders_by_magnitude() {
        let records = vec![
            EmissionRecord::new(
                Substance::Nox,
                Quantity::kilograms(1.0),
                Medium::Air,
                "incineration",
                false,
            )
            .unwrap(),
            EmissionRecord::new(
                Substance::Co2Fossil,
                Quantity::kilograms(500.0),
                Medium::Air,
                "incineration",
                false,
            )
            .unwrap(),
            EmissionRecord::new(
                Substance::Hg,
                Quantity::kilograms(0.01),
                Medium::Air,
                "incineration",
                false,
            )
            .unwrap(),
        ];
        let inv = aggregate("H1", "BASELINE", &records, &[]).unwrap();
        let top = rank_flows(&inv, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].substance, Substance::Co2Fossil);
        assert_eq!(top[1].substance, Substance::Nox);
    }
}
