//! Built-in configuration data and synthetic load generation.

pub mod factors;
pub mod hospitals;
pub mod sample;
pub mod scenarios;

pub use factors::{EmissionFactor, FactorBasis, FactorTables};
pub use sample::{generate_loads, MonthlyLoad};
