//! Scenario definitions and eager validation.
//!
//! Scenarios are validated up front, before any stream processing, so a
//! systemic misconfiguration fails the whole run fast instead of surfacing
//! halfway through a batch. An override key naming a (process, substance)
//! pair the process does not emit is rejected here — it is never allowed to
//! silently no-op.

use std::fs::File;
use std::path::Path;

use crate::data::factors::FactorTables;
use crate::domain::{FactorMultiplier, ProcessKind, ScenarioConfig, Substance, WasteCategory};
use crate::error::EngineError;
use crate::process;

/// Current practice: everything incinerated, default segregation.
pub fn baseline() -> ScenarioConfig {
    ScenarioConfig {
        name: "BASELINE".into(),
        segregation_override: None,
        factor_multipliers: Vec::new(),
        indirect_enabled: true,
        routing: WasteCategory::ALL
            .into_iter()
            .map(|c| (c, ProcessKind::Incineration))
            .collect(),
    }
}

/// Flue-gas cleaning retrofit plus better sorting at the ward.
pub fn enhanced_incineration() -> ScenarioConfig {
    let m = |substance, value| FactorMultiplier {
        process: ProcessKind::Incineration,
        substance,
        value,
    };
    ScenarioConfig {
        name: "ENHANCED_INCINERATION".into(),
        segregation_override: Some(0.8),
        factor_multipliers: vec![
            m(Substance::Pm10, 0.2),
            m(Substance::Pm25, 0.2),
            m(Substance::Nox, 0.4),
        ],
        indirect_enabled: true,
        routing: WasteCategory::ALL
            .into_iter()
            .map(|c| (c, ProcessKind::Incineration))
            .collect(),
    }
}

/// Technology mix: non-burn treatment for the infectious/sharps fraction,
/// pyrolysis for the bulk, near-complete segregation.
pub fn high_tech() -> ScenarioConfig {
    ScenarioConfig {
        name: "HIGH_TECH".into(),
        segregation_override: Some(0.9),
        factor_multipliers: vec![
            FactorMultiplier {
                process: ProcessKind::Incineration,
                substance: Substance::Co2Fossil,
                value: 0.5,
            },
            FactorMultiplier {
                process: ProcessKind::Incineration,
                substance: Substance::Pm10,
                value: 0.2,
            },
        ],
        indirect_enabled: true,
        routing: [
            (WasteCategory::General, ProcessKind::Pyrolysis),
            (WasteCategory::Infectious, ProcessKind::Microwave),
            (WasteCategory::Sharps, ProcessKind::Autoclave),
            (WasteCategory::Pharmaceutical, ProcessKind::Incineration),
            (WasteCategory::Chemical, ProcessKind::Incineration),
            (WasteCategory::HeavyMetals, ProcessKind::Landfill),
            (WasteCategory::Radioactive, ProcessKind::Incineration),
        ]
        .into(),
    }
}

/// The enumerated scenario set.
pub fn builtin() -> Vec<ScenarioConfig> {
    vec![baseline(), enhanced_incineration(), high_tech()]
}

/// Validate a scenario against the factor tables.
pub fn validate_scenario(
    scenario: &ScenarioConfig,
    tables: &FactorTables,
) -> Result<(), EngineError> {
    if let Some(efficiency) = scenario.segregation_override {
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(EngineError::Config(format!(
                "scenario {}: segregation override {efficiency} outside [0, 1]",
                scenario.name
            )));
        }
    }

    for multiplier in &scenario.factor_multipliers {
        if !multiplier.value.is_finite() || multiplier.value < 0.0 {
            return Err(EngineError::Config(format!(
                "scenario {}: negative multiplier for {}/{}",
                scenario.name, multiplier.process, multiplier.substance
            )));
        }
        // The key must name a factor the process actually has. Table-backed
        // substances must be present in the loaded tables; model-derived
        // substances are part of the variant's closed emission list.
        let known = tables.has_factor(multiplier.process, multiplier.substance)
            || process::emitted_substances(multiplier.process).contains(&multiplier.substance);
        if !known {
            return Err(EngineError::Config(format!(
                "scenario {}: unknown override key {}/{}",
                scenario.name, multiplier.process, multiplier.substance
            )));
        }
    }

    for category in WasteCategory::ALL {
        let Some(target) = scenario.routing.get(&category) else {
            return Err(EngineError::Config(format!(
                "scenario {}: no route for waste category '{category}'",
                scenario.name
            )));
        };
        if !process::supported_categories(*target).contains(&category) {
            return Err(EngineError::Config(format!(
                "scenario {}: routes '{category}' to {target}, which cannot treat it",
                scenario.name
            )));
        }
    }

    Ok(())
}

/// Load scenarios from a JSON file and validate them eagerly.
pub fn load_scenarios_json(
    path: &Path,
    tables: &FactorTables,
) -> Result<Vec<ScenarioConfig>, EngineError> {
    let file = File::open(path).map_err(|e| {
        EngineError::Io(format!("Failed to open scenarios JSON '{}': {e}", path.display()))
    })?;
    let scenarios: Vec<ScenarioConfig> = serde_json::from_reader(file)
        .map_err(|e| EngineError::Io(format!("Invalid scenarios JSON: {e}")))?;
    for scenario in &scenarios {
        validate_scenario(scenario, tables)?;
    }
    Ok(scenarios)
}
