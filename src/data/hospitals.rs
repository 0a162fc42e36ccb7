//! Hospital profiles: waste generation and facility-specific indirect factors.
//!
//! The built-in set covers the five study hospitals; external profiles can be
//! loaded from JSON. Profiles arrive pre-validated in provenance terms — only
//! internal consistency (fraction simplex, ranges) is checked here.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::domain::{
    Downstream, EnergyInputs, HospitalProfile, Infrastructure, Transportation, WasteCategory,
};
use crate::error::EngineError;

/// Category mass fractions shared by the built-in hospitals.
pub fn default_composition() -> BTreeMap<WasteCategory, f64> {
    BTreeMap::from([
        (WasteCategory::General, 0.638),
        (WasteCategory::Infectious, 0.18),
        (WasteCategory::Sharps, 0.04),
        (WasteCategory::Pharmaceutical, 0.05),
        (WasteCategory::Chemical, 0.055),
        (WasteCategory::HeavyMetals, 0.03),
        (WasteCategory::Radioactive, 0.007),
    ])
}

fn profile(
    id: &str,
    annual_waste_kg: f64,
    segregation_efficiency: f64,
    distance_km: f64,
    truck_load_t: f64,
) -> HospitalProfile {
    HospitalProfile {
        hospital_id: id.to_string(),
        annual_waste_kg,
        segregation_efficiency,
        composition: default_composition(),
        energy: EnergyInputs {
            energy_use_kwh_per_kg: 0.12,
            co2_fossil_per_kwh: 0.40,
            so2_per_kwh: 2.0e-4,
            pm25_per_kwh: 1.2e-4,
        },
        transport: Transportation {
            distance_km,
            truck_load_t,
            co2_fossil_per_tkm: 0.08,
            nox_per_tkm: 1.2e-3,
        },
        infrastructure: Infrastructure {
            construction_co2_per_kg: 0.02,
        },
        downstream: Downstream {
            residue_ratio: 0.04,
            residue_co2_per_kg: 0.15,
            residue_so2_per_kg: 5.0e-4,
        },
    }
}

/// The five built-in study hospitals.
pub fn builtin() -> Vec<HospitalProfile> {
    vec![
        profile("KBTH", 480_000.0, 0.55, 0.5, 0.44),
        profile("KATH", 340_000.0, 0.50, 4.0, 0.31),
        profile("CCTH", 130_000.0, 0.45, 9.2, 0.122),
        profile("BRH", 110_000.0, 0.40, 1.4, 0.1),
        profile("UCCH", 25_000.0, 0.35, 4.7, 0.023),
    ]
}

/// Internal-consistency checks for a profile.
pub fn validate_profile(profile: &HospitalProfile) -> Result<(), EngineError> {
    if profile.annual_waste_kg <= 0.0 || !profile.annual_waste_kg.is_finite() {
        return Err(EngineError::Config(format!(
            "hospital {}: annual waste must be positive",
            profile.hospital_id
        )));
    }
    if !(0.0..=1.0).contains(&profile.segregation_efficiency) {
        return Err(EngineError::Config(format!(
            "hospital {}: segregation efficiency outside [0, 1]",
            profile.hospital_id
        )));
    }
    let mut sum = 0.0;
    for (category, fraction) in &profile.composition {
        if !fraction.is_finite() || *fraction < 0.0 {
            return Err(EngineError::Config(format!(
                "hospital {}: negative fraction for {category}",
                profile.hospital_id
            )));
        }
        sum += fraction;
    }
    if (sum - 1.0).abs() > 1e-6 {
        return Err(EngineError::Config(format!(
            "hospital {}: composition fractions sum to {sum}, expected 1",
            profile.hospital_id
        )));
    }
    if profile.transport.distance_km < 0.0 || profile.transport.truck_load_t <= 0.0 {
        return Err(EngineError::Config(format!(
            "hospital {}: invalid transport parameters",
            profile.hospital_id
        )));
    }
    Ok(())
}

/// Load hospital profiles from a JSON file.
pub fn load_profiles_json(path: &Path) -> Result<Vec<HospitalProfile>, EngineError> {
    let file = File::open(path).map_err(|e| {
        EngineError::Io(format!("Failed to open profiles JSON '{}': {e}", path.display()))
    })?;
    let profiles: Vec<HospitalProfile> = serde_json::from_reader(file)
        .map_err(|e| EngineError::Io(format!("Invalid profiles JSON: {e}")))?;
    for profile in &profiles {
        validate_profile(profile)?;
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_validate() {
        for profile in builtin() {
            validate_profile(&profile).unwrap();
        }
    }

    #[test]
    fn fraction_simplex_is_enforced() {
        let mut p = builtin().remove(0);
        p.composition.insert(WasteCategory::General, 0.9);
        assert!(matches!(validate_profile(&p), Err(EngineError::Config(_))));
    }
}
