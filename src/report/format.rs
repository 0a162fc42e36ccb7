//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the calculation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::BatchOutcome;
use crate::domain::ScenarioConfig;
use crate::report::{direct_indirect_split, rank_flows};
use crate::scoring::FlowRegistry;

/// Format the full batch summary: per-pair inventories plus failures.
pub fn format_batch_summary(outcome: &BatchOutcome, top_n: usize, registry: &FlowRegistry) -> String {
    let mut out = String::new();

    out.push_str("=== hbw - Biomedical Waste Treatment LCA (emission inventory) ===\n");
    out.push_str(&format!(
        "Pairs: {} computed, {} failed\n",
        outcome.outputs.len(),
        outcome.failures.len()
    ));

    for output in &outcome.outputs {
        let (direct_kg, indirect_kg) = direct_indirect_split(output).unwrap_or((f64::NAN, f64::NAN));
        out.push_str(&format!(
            "\n[{} / {}] waste={:.0} kg | direct={:.1} kg | indirect={:.1} kg\n",
            output.scenario, output.hospital_id, output.total_mass_kg, direct_kg, indirect_kg
        ));
        for entry in rank_flows(&output.inventory, top_n) {
            let uuid = registry
                .lookup(entry.substance)
                .map(|f| f.uuid)
                .unwrap_or_else(|_| "-".into());
            out.push_str(&format!(
                "  {:<14} {:<6} {:>16.6} kg  {}\n",
                entry.substance.label(),
                entry.medium.to_string(),
                entry.amount_kg,
                uuid
            ));
        }
    }

    if !outcome.failures.is_empty() {
        out.push_str("\nFailures:\n");
        for failure in &outcome.failures {
            out.push_str(&format!(
                "- ({}, {}): {}\n",
                failure.hospital_id, failure.scenario, failure.error
            ));
        }
    }

    out
}

/// Format the scenario list for `hbw scenarios`.
pub fn format_scenarios(scenarios: &[ScenarioConfig]) -> String {
    let mut out = String::new();
    out.push_str("Available scenarios:\n");
    for scenario in scenarios {
        out.push_str(&format!(
            "\n{} (indirect={}, segregation={})\n",
            scenario.name,
            if scenario.indirect_enabled { "on" } else { "off" },
            scenario
                .segregation_override
                .map(|e| format!("{e:.2}"))
                .unwrap_or_else(|| "hospital default".into()),
        ));
        for (category, process) in &scenario.routing {
            out.push_str(&format!("  {:<16} -> {}\n", category.to_string(), process));
        }
        for multiplier in &scenario.factor_multipliers {
            out.push_str(&format!(
                "  x{:.2} on {}/{}\n",
                multiplier.value, multiplier.process, multiplier.substance
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{run_batch, RunPlan};
    use crate::data::factors::FactorTables;
    use crate::data::{hospitals, scenarios};

    #[test]
    fn summary_mentions_every_pair() {
        let tables = FactorTables::builtin();
        let plan = RunPlan {
            profiles: hospitals::builtin(),
            scenarios: scenarios::builtin(),
            seed: 42,
            months: 12,
        };
        let outcome = run_batch(&plan, &tables).unwrap();
        let text = format_batch_summary(&outcome, 5, &FlowRegistry);
        for scenario in &plan.scenarios {
            assert!(text.contains(&scenario.name));
        }
        for profile in &plan.profiles {
            assert!(text.contains(&profile.hospital_id));
        }
        assert!(!text.contains("Failures:"));
    }

    #[test]
    fn scenario_listing_shows_routing() {
        let text = format_scenarios(&scenarios::builtin());
        assert!(text.contains("HIGH_TECH"));
        assert!(text.contains("-> Microwave"));
    }
}
