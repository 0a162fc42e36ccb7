//! Shared batch pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load synthesis -> stream build -> segregation -> direct -> indirect -> aggregate
//!
//! Each (hospital, scenario) pair walks the stages strictly in that order;
//! the stage outputs feed the next stage's inputs, and the final Inventory is
//! immutable. Pairs are independent — they share only read-only tables and
//! scenario configs — so the batch fans out across a rayon pool, and one
//! pair's failure is collected without aborting the others.

use std::collections::BTreeMap;

use log::warn;
use rayon::prelude::*;

use crate::data::factors::FactorTables;
use crate::data::{hospitals, sample, scenarios};
use crate::domain::{
    EmissionRecord, HospitalProfile, ProcessKind, ScenarioConfig, WasteCategory, WasteStream,
};
use crate::error::EngineError;
use crate::indirect;
use crate::inventory::{self, Inventory};
use crate::process;
use crate::units::Quantity;

/// Everything a batch run needs besides the factor tables.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub profiles: Vec<HospitalProfile>,
    pub scenarios: Vec<ScenarioConfig>,
    pub seed: u64,
    pub months: u32,
}

/// All computed outputs of one (hospital, scenario) execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOutput {
    pub hospital_id: String,
    pub scenario: String,
    pub total_mass_kg: f64,
    pub streams: Vec<WasteStream>,
    pub direct: Vec<EmissionRecord>,
    pub indirect: Vec<EmissionRecord>,
    pub inventory: Inventory,
}

/// A pair that failed mid-pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    pub hospital_id: String,
    pub scenario: String,
    pub error: EngineError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub outputs: Vec<PairOutput>,
    pub failures: Vec<PairFailure>,
}

/// Execute every (hospital, scenario) pair in the plan.
///
/// Configuration problems (bad tables, bad scenario, bad profile) fail the
/// whole run before any stream is processed. Calculation failures of a single
/// pair are collected into `failures` and do not block the rest.
pub fn run_batch(plan: &RunPlan, tables: &FactorTables) -> Result<BatchOutcome, EngineError> {
    tables.validate()?;
    for profile in &plan.profiles {
        hospitals::validate_profile(profile)?;
    }
    for scenario in &plan.scenarios {
        scenarios::validate_scenario(scenario, tables)?;
    }
    if plan.months == 0 {
        return Err(EngineError::Config("months must be > 0".into()));
    }

    let pairs: Vec<(&ScenarioConfig, &HospitalProfile)> = plan
        .scenarios
        .iter()
        .flat_map(|s| plan.profiles.iter().map(move |p| (s, p)))
        .collect();

    let results: Vec<Result<PairOutput, PairFailure>> = pairs
        .par_iter()
        .map(|(scenario, profile)| {
            run_pair(profile, scenario, tables, plan.seed, plan.months).map_err(|error| {
                PairFailure {
                    hospital_id: profile.hospital_id.clone(),
                    scenario: scenario.name.clone(),
                    error,
                }
            })
        })
        .collect();

    let mut outputs = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(failure) => {
                warn!(
                    "pair ({}, {}) failed: {}",
                    failure.hospital_id, failure.scenario, failure.error
                );
                failures.push(failure);
            }
        }
    }

    Ok(BatchOutcome { outputs, failures })
}

/// Execute the staged pipeline for one (hospital, scenario) pair.
pub fn run_pair(
    profile: &HospitalProfile,
    scenario: &ScenarioConfig,
    tables: &FactorTables,
    seed: u64,
    months: u32,
) -> Result<PairOutput, EngineError> {
    // 1) Synthesize the period load and partition it into per-process streams.
    let loads = sample::generate_loads(profile, seed, months)?;
    let total_mass_kg = sample::total_mass_kg(&loads);
    let mut streams = build_streams(profile, scenario, total_mass_kg)?;

    // 2) Apply segregation adjustment to every stream.
    let efficiency = scenario
        .segregation_override
        .unwrap_or(profile.segregation_efficiency);
    for stream in &mut streams {
        stream.adjust_for_segregation(efficiency)?;
    }

    // 3) Direct emissions, one model per stream.
    let mut direct = Vec::new();
    for stream in &streams {
        let model = process::process_for(stream.assigned_process);
        direct.extend(model.compute_direct_emissions(stream, tables, scenario)?);
    }

    // 4) Indirect contributions (empty when the scenario disables them).
    let mut indirect_records = Vec::new();
    for stream in &streams {
        indirect_records.extend(indirect::compute(stream, profile, scenario)?);
    }

    // 5) Aggregate into the terminal inventory.
    let inventory = inventory::aggregate(
        &profile.hospital_id,
        &scenario.name,
        &direct,
        &indirect_records,
    )?;

    Ok(PairOutput {
        hospital_id: profile.hospital_id.clone(),
        scenario: scenario.name.clone(),
        total_mass_kg,
        streams,
        direct,
        indirect: indirect_records,
        inventory,
    })
}

/// Split a hospital's composition into one stream per routed process.
fn build_streams(
    profile: &HospitalProfile,
    scenario: &ScenarioConfig,
    total_mass_kg: f64,
) -> Result<Vec<WasteStream>, EngineError> {
    let mut by_process: BTreeMap<ProcessKind, BTreeMap<WasteCategory, Quantity>> = BTreeMap::new();
    for (category, fraction) in &profile.composition {
        let Some(process) = scenario.routing.get(category) else {
            return Err(EngineError::Config(format!(
                "scenario {}: no route for waste category '{category}'",
                scenario.name
            )));
        };
        by_process
            .entry(*process)
            .or_default()
            .insert(*category, Quantity::kilograms(fraction * total_mass_kg));
    }

    Ok(by_process
        .into_iter()
        .map(|(process, composition)| {
            WasteStream::new(
                profile.hospital_id.clone(),
                composition,
                profile.segregation_efficiency,
                process,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Substance;

    fn plan() -> RunPlan {
        RunPlan {
            profiles: hospitals::builtin(),
            scenarios: scenarios::builtin(),
            seed: 42,
            months: 12,
        }
    }

    #[test]
    fn pair_execution_is_deterministic() {
        let tables = FactorTables::builtin();
        let profile = hospitals::builtin().remove(0);
        let scenario = scenarios::high_tech();
        let a = run_pair(&profile, &scenario, &tables, 42, 12).unwrap();
        let b = run_pair(&profile, &scenario, &tables, 42, 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stream_masses_conserve_the_generated_load() {
        let tables = FactorTables::builtin();
        let profile = hospitals::builtin().remove(0);
        let scenario = scenarios::high_tech();
        let output = run_pair(&profile, &scenario, &tables, 7, 12).unwrap();
        let streams_total: f64 = output
            .streams
            .iter()
            .map(|s| s.total_mass().unwrap().value)
            .sum();
        assert!((streams_total - output.total_mass_kg).abs() < 1e-6);
    }

    #[test]
    fn all_records_non_negative_except_recovery_credits() {
        let tables = FactorTables::builtin();
        let outcome = run_batch(&plan(), &tables).unwrap();
        assert!(outcome.failures.is_empty());
        for output in &outcome.outputs {
            for record in output.direct.iter().chain(&output.indirect) {
                if record.amount.value < 0.0 {
                    assert_eq!(record.substance, Substance::Co2Fossil);
                    assert_eq!(record.source_process_id, "pyrolysis");
                    assert!(record.amount.value >= tables.pyrolysis.co2_credit_floor_kg);
                }
            }
        }
    }

    #[test]
    fn batch_covers_every_pair_in_order() {
        let tables = FactorTables::builtin();
        let p = plan();
        let outcome = run_batch(&p, &tables).unwrap();
        assert_eq!(outcome.outputs.len(), p.profiles.len() * p.scenarios.len());
        // Rerunning the batch reproduces it exactly.
        let again = run_batch(&p, &tables).unwrap();
        assert_eq!(outcome, again);
    }

    #[test]
    fn disabled_indirect_yields_no_indirect_records() {
        let tables = FactorTables::builtin();
        let profile = hospitals::builtin().remove(0);
        let mut scenario = scenarios::baseline();
        scenario.indirect_enabled = false;
        let output = run_pair(&profile, &scenario, &tables, 42, 12).unwrap();
        assert!(output.indirect.is_empty());
        assert!(!output.direct.is_empty());
    }

    #[test]
    fn one_failing_pair_does_not_abort_the_batch() {
        let mut tables = FactorTables::builtin();
        // Landfill is only used by HIGH_TECH routing; breaking its table
        // breaks those pairs and no others.
        tables
            .emissions
            .get_mut(&ProcessKind::Landfill)
            .unwrap()
            .remove(&Substance::Nmvoc);
        let p = plan();
        let outcome = run_batch(&p, &tables).unwrap();
        assert_eq!(outcome.failures.len(), p.profiles.len());
        assert!(outcome
            .failures
            .iter()
            .all(|f| f.scenario == "HIGH_TECH"
                && matches!(f.error, EngineError::MissingFactor { .. })));
        assert_eq!(
            outcome.outputs.len(),
            p.profiles.len() * (p.scenarios.len() - 1)
        );
    }

    #[test]
    fn misconfigured_scenario_fails_the_run_eagerly() {
        let tables = FactorTables::builtin();
        let mut p = plan();
        p.scenarios[0].segregation_override = Some(2.0);
        assert!(matches!(run_batch(&p, &tables), Err(EngineError::Config(_))));
    }
}
