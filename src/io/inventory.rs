//! Read/write inventory JSON files.
//!
//! Inventory JSON is the "portable" representation of a batch run:
//! - run metadata (seed, months, generation timestamp)
//! - one aggregated inventory per computed (hospital, scenario) pair
//!
//! It is what the downstream scoring/report steps consume when they run out
//! of process.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::app::pipeline::PairOutput;
use crate::error::EngineError;
use crate::inventory::Inventory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryFile {
    pub tool: String,
    pub generated: String,
    pub seed: u64,
    pub months: u32,
    pub inventories: Vec<Inventory>,
}

/// Write the batch's inventories to a JSON file.
pub fn write_inventory_json(
    path: &Path,
    outputs: &[PairOutput],
    seed: u64,
    months: u32,
) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| {
        EngineError::Io(format!(
            "Failed to create inventory JSON '{}': {e}",
            path.display()
        ))
    })?;

    let contents = InventoryFile {
        tool: "hbw".to_string(),
        generated: Local::now().to_rfc3339(),
        seed,
        months,
        inventories: outputs.iter().map(|o| o.inventory.clone()).collect(),
    };

    serde_json::to_writer_pretty(file, &contents)
        .map_err(|e| EngineError::Io(format!("Failed to write inventory JSON: {e}")))?;

    Ok(())
}

/// Read a previously exported inventory JSON file.
pub fn read_inventory_json(path: &Path) -> Result<InventoryFile, EngineError> {
    let file = File::open(path).map_err(|e| {
        EngineError::Io(format!(
            "Failed to open inventory JSON '{}': {e}",
            path.display()
        ))
    })?;
    let contents: InventoryFile = serde_json::from_reader(file)
        .map_err(|e| EngineError::Io(format!("Invalid inventory JSON: {e}")))?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_pair;
    use crate::data::factors::FactorTables;
    use crate::data::{hospitals, scenarios};

    #[test]
    fn inventory_json_round_trips() {
        let tables = FactorTables::builtin();
        let profile = hospitals::builtin().remove(0);
        let scenario = scenarios::baseline();
        let output = run_pair(&profile, &scenario, &tables, 42, 12).unwrap();

        let path = std::env::temp_dir().join(format!("hbw_inventory_{}.json", std::process::id()));
        write_inventory_json(&path, std::slice::from_ref(&output), 42, 12).unwrap();
        let loaded = read_inventory_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.tool, "hbw");
        assert_eq!(loaded.seed, 42);
        assert_eq!(loaded.inventories.len(), 1);
        assert_eq!(loaded.inventories[0], output.inventory);
    }
}
