//! Export aggregated inventories to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts; one row per (hospital, scenario, substance, medium) flow.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::PairOutput;
use crate::error::EngineError;
use crate::scoring::FlowRegistry;

/// Write all pair inventories to a CSV file.
pub fn write_results_csv(
    path: &Path,
    outputs: &[PairOutput],
    registry: &FlowRegistry,
) -> Result<(), EngineError> {
    let mut file = File::create(path).map_err(|e| {
        EngineError::Io(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "hospital,scenario,substance,medium,amount_kg,flow_uuid")
        .map_err(|e| EngineError::Io(format!("Failed to write export CSV header: {e}")))?;

    for output in outputs {
        for entry in output.inventory.entries() {
            let flow = registry.lookup(entry.substance)?;
            writeln!(
                file,
                "{},{},{},{},{:.10e},{}",
                output.hospital_id,
                output.scenario,
                entry.substance.label(),
                entry.medium,
                entry.amount_kg,
                flow.uuid,
            )
            .map_err(|e| EngineError::Io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}
