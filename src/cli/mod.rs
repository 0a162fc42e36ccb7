//! Command-line parsing for the waste-treatment LCA runner.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the emission-model code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "hbw",
    version,
    about = "Hospital biomedical-waste treatment LCA (emission inventory engine)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the batch over all (hospital, scenario) pairs, print inventories,
    /// and optionally export them.
    Run(RunArgs),
    /// List the scenario set with overrides and routing.
    Scenarios,
}

/// Options for a batch run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Restrict the run to one hospital id (e.g. KBTH).
    #[arg(long)]
    pub hospital: Option<String>,

    /// Restrict the run to one scenario name (e.g. BASELINE).
    #[arg(long)]
    pub scenario: Option<String>,

    /// Random seed for monthly load generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of months of waste load to synthesize.
    #[arg(long, default_value_t = 12)]
    pub months: u32,

    /// Show top-N flows per inventory.
    #[arg(long, default_value_t = 8)]
    pub top: usize,

    /// Export flows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export inventories (run metadata + flows) to JSON.
    #[arg(long = "export-inventory")]
    pub export_inventory: Option<PathBuf>,

    /// Load scenarios from a JSON file instead of the built-in set.
    #[arg(long = "scenarios-file")]
    pub scenarios_file: Option<PathBuf>,

    /// Load hospital profiles from a JSON file instead of the built-in set.
    #[arg(long = "profiles-file")]
    pub profiles_file: Option<PathBuf>,
}
