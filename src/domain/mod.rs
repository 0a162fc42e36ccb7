//! Core waste-flow data model.

mod types;

pub use types::{
    Downstream, EmissionRecord, EnergyInputs, FactorMultiplier, HospitalProfile, Infrastructure,
    Medium, ProcessKind, ScenarioConfig, Substance, Transportation, WasteCategory, WasteStream,
};
