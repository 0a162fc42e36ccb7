//! Hospital-specific indirect emissions.
//!
//! Everything here is attributable to supporting activity rather than the
//! treatment reaction: grid electricity, collection transport, amortized
//! construction, and downstream residue handling. Contributions are additive
//! and linear in mass and distance; records share the EmissionRecord shape
//! with direct emissions but are tagged `is_indirect = true`.

use log::debug;

use crate::domain::{
    EmissionRecord, HospitalProfile, Medium, ScenarioConfig, Substance, WasteStream,
};
use crate::error::EngineError;
use crate::units::Quantity;

fn record(
    substance: Substance,
    amount_kg: f64,
    group: &str,
) -> Result<EmissionRecord, EngineError> {
    EmissionRecord::new(
        substance,
        Quantity::kilograms(amount_kg),
        Medium::Air,
        format!("indirect:{group}"),
        true,
    )
}

/// Compute indirect emissions for one stream.
///
/// Returns an empty sequence when the scenario disables indirect accounting,
/// regardless of profile content.
pub fn compute(
    stream: &WasteStream,
    profile: &HospitalProfile,
    scenario: &ScenarioConfig,
) -> Result<Vec<EmissionRecord>, EngineError> {
    if !scenario.indirect_enabled {
        return Ok(Vec::new());
    }

    let mass_kg = stream.total_mass()?.value;
    let mut records = Vec::with_capacity(8);

    let energy = &profile.energy;
    let kwh = mass_kg * energy.energy_use_kwh_per_kg;
    records.push(record(Substance::Co2Fossil, kwh * energy.co2_fossil_per_kwh, "energy")?);
    records.push(record(Substance::So2, kwh * energy.so2_per_kwh, "energy")?);
    records.push(record(Substance::Pm25, kwh * energy.pm25_per_kwh, "energy")?);

    let transport = &profile.transport;
    let tkm = (mass_kg / 1000.0) * transport.distance_km;
    records.push(record(Substance::Co2Fossil, tkm * transport.co2_fossil_per_tkm, "transport")?);
    records.push(record(Substance::Nox, tkm * transport.nox_per_tkm, "transport")?);

    records.push(record(
        Substance::Co2Fossil,
        mass_kg * profile.infrastructure.construction_co2_per_kg,
        "infrastructure",
    )?);

    let downstream = &profile.downstream;
    let residue_kg = mass_kg * downstream.residue_ratio;
    records.push(record(Substance::Co2Fossil, residue_kg * downstream.residue_co2_per_kg, "downstream")?);
    records.push(record(Substance::So2, residue_kg * downstream.residue_so2_per_kg, "downstream")?);

    debug!(
        "indirect for {}: {} kg, {} t-km, {} kg residue",
        stream.hospital_id, mass_kg, tkm, residue_kg
    );
    Ok(records)
}
