//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - assembles the run plan (built-in or file-loaded configuration)
//! - runs the batch pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;
use log::info;

use crate::cli::{Command, RunArgs};
use crate::data::factors::FactorTables;
use crate::data::{hospitals, scenarios};
use crate::error::EngineError;
use crate::scoring::FlowRegistry;

pub mod pipeline;

/// Entry point for the `hbw` binary.
pub fn run() -> Result<(), EngineError> {
    env_logger::init();

    // `hbw` with no subcommand should behave like `hbw run`. Clap requires a
    // subcommand name, so we do a small, explicit rewrite of the argv list
    // before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Scenarios => {
            println!("{}", crate::report::format_scenarios(&scenarios::builtin()));
            Ok(())
        }
    }
}

fn handle_run(args: RunArgs) -> Result<(), EngineError> {
    let tables = FactorTables::builtin();

    let mut profiles = match &args.profiles_file {
        Some(path) => hospitals::load_profiles_json(path)?,
        None => hospitals::builtin(),
    };
    if let Some(wanted) = &args.hospital {
        profiles.retain(|p| &p.hospital_id == wanted);
        if profiles.is_empty() {
            return Err(EngineError::Config(format!("unknown hospital '{wanted}'")));
        }
    }

    let mut scenario_set = match &args.scenarios_file {
        Some(path) => scenarios::load_scenarios_json(path, &tables)?,
        None => scenarios::builtin(),
    };
    if let Some(wanted) = &args.scenario {
        scenario_set.retain(|s| &s.name == wanted);
        if scenario_set.is_empty() {
            return Err(EngineError::Config(format!("unknown scenario '{wanted}'")));
        }
    }

    let plan = pipeline::RunPlan {
        profiles,
        scenarios: scenario_set,
        seed: args.seed,
        months: args.months,
    };
    info!(
        "running {} hospitals x {} scenarios (seed={}, months={})",
        plan.profiles.len(),
        plan.scenarios.len(),
        plan.seed,
        plan.months
    );

    let registry = FlowRegistry;
    let outcome = pipeline::run_batch(&plan, &tables)?;

    println!(
        "{}",
        crate::report::format_batch_summary(&outcome, args.top, &registry)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_results_csv(path, &outcome.outputs, &registry)?;
        info!("wrote CSV export to {}", path.display());
    }
    if let Some(path) = &args.export_inventory {
        crate::io::inventory::write_inventory_json(path, &outcome.outputs, args.seed, args.months)?;
        info!("wrote inventory JSON to {}", path.display());
    }

    Ok(())
}

/// Rewrite argv so `hbw` defaults to `hbw run`.
///
/// Rules:
/// - `hbw`                     -> `hbw run`
/// - `hbw --seed 7 ...`        -> `hbw run --seed 7 ...`
/// - `hbw --help/--version`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "scenarios");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
