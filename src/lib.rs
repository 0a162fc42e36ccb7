//! `hbw-lca` library crate.
//!
//! The binary (`hbw`) is a thin wrapper around this library so that:
//!
//! - the emission calculation engine is testable without spawning processes
//! - modules are reusable (e.g., future service front-ends, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod indirect;
pub mod inventory;
pub mod io;
pub mod process;
pub mod report;
pub mod scoring;
pub mod units;
