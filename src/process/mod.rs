//! Treatment-process emission models.
//!
//! The six technologies form a closed set: a [`TreatmentProcess`] trait with
//! one implementation per [`ProcessKind`], selected by enum rather than
//! open-ended registration. Each variant owns its emission chemistry; the
//! shared obligations live here:
//!
//! - a stream with nonzero mass in a category the process cannot model is an
//!   `UnsupportedCategory` error
//! - a zero-mass stream yields an empty record set, not an error
//! - scenario multipliers apply to base factors before amounts are computed
//! - the input stream is never mutated
//! - a factor the model needs but the tables lack is a `MissingFactor` error

use crate::data::factors::FactorTables;
use crate::domain::{
    EmissionRecord, Medium, ProcessKind, ScenarioConfig, Substance, WasteCategory, WasteStream,
};
use crate::error::EngineError;
use crate::units::Quantity;

mod autoclave;
mod chemical;
mod incineration;
mod landfill;
mod microwave;
mod pyrolysis;

pub use autoclave::Autoclave;
pub use chemical::ChemicalDisinfection;
pub use incineration::Incineration;
pub use landfill::Landfill;
pub use microwave::Microwave;
pub use pyrolysis::Pyrolysis;

/// Masses below this are treated as zero routed mass.
const ZERO_MASS_EPS_KG: f64 = 1e-12;

/// Direct-emission model for one treatment technology.
pub trait TreatmentProcess: Sync {
    fn kind(&self) -> ProcessKind;

    /// Compute direct emissions for a stream routed to this process.
    fn compute_direct_emissions(
        &self,
        stream: &WasteStream,
        tables: &FactorTables,
        scenario: &ScenarioConfig,
    ) -> Result<Vec<EmissionRecord>, EngineError>;
}

static INCINERATION: Incineration = Incineration;
static LANDFILL: Landfill = Landfill;
static PYROLYSIS: Pyrolysis = Pyrolysis;
static CHEMICAL: ChemicalDisinfection = ChemicalDisinfection;
static AUTOCLAVE: Autoclave = Autoclave;
static MICROWAVE: Microwave = Microwave;

/// The implementation for a process kind.
pub fn process_for(kind: ProcessKind) -> &'static dyn TreatmentProcess {
    match kind {
        ProcessKind::Incineration => &INCINERATION,
        ProcessKind::Landfill => &LANDFILL,
        ProcessKind::Pyrolysis => &PYROLYSIS,
        ProcessKind::ChemicalDisinfection => &CHEMICAL,
        ProcessKind::Autoclave => &AUTOCLAVE,
        ProcessKind::Microwave => &MICROWAVE,
    }
}

/// Waste categories a process knows how to treat.
pub fn supported_categories(kind: ProcessKind) -> &'static [WasteCategory] {
    match kind {
        // Thermal destruction handles the full spectrum.
        ProcessKind::Incineration | ProcessKind::Pyrolysis => &WasteCategory::ALL,
        ProcessKind::Landfill => &[
            WasteCategory::General,
            WasteCategory::Sharps,
            WasteCategory::HeavyMetals,
        ],
        ProcessKind::ChemicalDisinfection | ProcessKind::Autoclave | ProcessKind::Microwave => &[
            WasteCategory::General,
            WasteCategory::Infectious,
            WasteCategory::Sharps,
        ],
    }
}

/// The closed list of substances a process can emit (table-backed plus
/// model-derived). Scenario override keys are checked against this.
pub fn emitted_substances(kind: ProcessKind) -> &'static [Substance] {
    use Substance::*;
    match kind {
        ProcessKind::Incineration => &[
            Co2Fossil, Co2Biogenic, So2, Nox, Nh3, Pm10, Pm25, Hg, Pb, Dioxin,
        ],
        ProcessKind::Landfill => &[Ch4Fossil, Co2Biogenic, Nh3, Nmvoc, Hg, Pb],
        ProcessKind::Pyrolysis => &[Co2Fossil, Ch4Fossil, Nmvoc, Pahs, Dioxin, Hg, Pb],
        ProcessKind::ChemicalDisinfection => &[Nmvoc, Pm10, Hcl, Cl2, Nh3],
        ProcessKind::Autoclave => &[Co2Fossil, Nmvoc],
        ProcessKind::Microwave => &[Co2Fossil, Nmvoc, Pm10],
    }
}

/// Shared prologue: category validation and the zero-mass short-circuit.
///
/// Returns the total routed mass, or `None` when the stream is empty.
fn checked_total_kg(
    kind: ProcessKind,
    stream: &WasteStream,
) -> Result<Option<f64>, EngineError> {
    let supported = supported_categories(kind);
    for (category, mass) in &stream.composition {
        if mass.in_kilograms()? > ZERO_MASS_EPS_KG && !supported.contains(category) {
            return Err(EngineError::UnsupportedCategory {
                process: kind,
                category: *category,
            });
        }
    }
    let total = stream.total_mass()?.value;
    if total <= ZERO_MASS_EPS_KG {
        return Ok(None);
    }
    Ok(Some(total))
}

/// Compute one record per listed substance from the factor tables.
///
/// `amount = basis mass x base factor x scenario multiplier`.
fn records_from_table(
    kind: ProcessKind,
    substances: &[Substance],
    stream: &WasteStream,
    tables: &FactorTables,
    scenario: &ScenarioConfig,
) -> Result<Vec<EmissionRecord>, EngineError> {
    let mut records = Vec::with_capacity(substances.len());
    for &substance in substances {
        let factor = tables.factor(kind, substance)?;
        let basis_kg = factor.basis.mass_kg(stream)?;
        let amount = basis_kg * factor.value * scenario.multiplier_for(kind, substance);
        records.push(EmissionRecord::new(
            substance,
            Quantity::kilograms(amount),
            factor.medium,
            kind.id(),
            false,
        )?);
    }
    Ok(records)
}

/// Convenience for model-derived (non-table) records.
fn derived_record(
    kind: ProcessKind,
    substance: Substance,
    amount_kg: f64,
    medium: Medium,
) -> Result<EmissionRecord, EngineError> {
    EmissionRecord::new(
        substance,
        Quantity::kilograms(amount_kg),
        medium,
        kind.id(),
        false,
    )
}
