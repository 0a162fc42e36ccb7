//! Interface to the external impact-scoring backend.
//!
//! The engine produces inventories; characterizing them into impact-category
//! scores is the backend's job. The surface area is deliberately narrow —
//! `lookup_flow` and `score` — so the backend (an LCA database, a remote
//! service, a test double) is swappable without touching the calculation
//! core. The built-in [`FlowRegistry`] maps substances to biosphere flow
//! UUIDs; it performs no scoring.

use serde::{Deserialize, Serialize};

use crate::domain::{Medium, Substance};
use crate::error::EngineError;
use crate::inventory::Inventory;

/// Identifier of a biosphere flow in the backend's database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRef {
    pub uuid: String,
}

/// Scoring dimensions exposed by the backend (CML v4.8 2016 set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCategory {
    HumanToxicity,
    ClimateChange,
    Eutrophication,
    Acidification,
    MarineAquaticEcotoxicity,
    TerrestrialEcotoxicity,
    FreshwaterAquaticEcotoxicity,
    PhotochemicalOxidation,
}

impl ImpactCategory {
    pub const ALL: [ImpactCategory; 8] = [
        ImpactCategory::HumanToxicity,
        ImpactCategory::ClimateChange,
        ImpactCategory::Eutrophication,
        ImpactCategory::Acidification,
        ImpactCategory::MarineAquaticEcotoxicity,
        ImpactCategory::TerrestrialEcotoxicity,
        ImpactCategory::FreshwaterAquaticEcotoxicity,
        ImpactCategory::PhotochemicalOxidation,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ImpactCategory::HumanToxicity => "Human Toxicity (HT)",
            ImpactCategory::ClimateChange => "Climate Change (CC)",
            ImpactCategory::Eutrophication => "Eutrophication (EP)",
            ImpactCategory::Acidification => "Acidification (AP)",
            ImpactCategory::MarineAquaticEcotoxicity => "Marine Aquatic Eco-Toxicity (MAE)",
            ImpactCategory::TerrestrialEcotoxicity => "Terrestrial Eco-Toxicity (TE)",
            ImpactCategory::FreshwaterAquaticEcotoxicity => "Freshwater Eco-Toxicity (FAE)",
            ImpactCategory::PhotochemicalOxidation => "Photochemical Oxidation (PO)",
        }
    }
}

/// The external scoring collaborator.
pub trait ImpactBackend {
    fn lookup_flow(&self, substance: Substance, medium: Medium) -> Result<FlowRef, EngineError>;

    fn score(&self, inventory: &Inventory, category: ImpactCategory) -> Result<f64, EngineError>;
}

/// Built-in substance-to-flow mapping.
///
/// Flow references are keyed by substance; compartment-specific variants are
/// resolved by the backend itself.
#[derive(Debug, Default, Clone)]
pub struct FlowRegistry;

impl FlowRegistry {
    pub fn lookup(&self, substance: Substance) -> Result<FlowRef, EngineError> {
        let uuid = match substance {
            Substance::Co2Fossil => "aa7cac3a-3625-41d4-bc54-33e2cf11ec46",
            Substance::Co2Biogenic => "d6235194-e4e6-4548-bfa3-ac095131aef4",
            Substance::Ch4Fossil => "70ef743b-3ed5-4a6d-b192-fb6d62378555",
            Substance::Nox => "77357947-ccc5-438e-9996-95e65e1e1bce",
            Substance::So2 => "78c3efe4-421c-4d30-82e4-b97ac5124993",
            Substance::Pm25 => "66f50b33-fd62-4fdd-a373-c5b0de7de00d",
            Substance::Pm10 => "7678cec7-b8e1-439d-8242-99cd452834b1",
            Substance::Hg => "5ec9c16a-959d-44cd-be7d-a935727d2151",
            Substance::Pb => "2718482b-8399-442e-b89a-52fbcc22d2e6",
            Substance::Dioxin => "f77c5e36-ee47-4437-b757-03139bb1d6d6",
            Substance::Pahs => "13d898ac-b9be-4723-a153-565e2a9144ac",
            Substance::Nmvoc => "33b38ccb-593b-4b11-b965-10d747ba3556",
            Substance::Nh3 => "0f440cc0-0f74-446d-99d6-8ff0e97a2444",
            Substance::Cl2 => "247ac273-60fa-4e21-9408-793f75fa1d37",
            Substance::Hcl => "c9410f27-3d33-4e0c-bf4a-6d2a1fc25bd2",
        };
        Ok(FlowRef { uuid: uuid.to_string() })
    }
}

impl ImpactBackend for FlowRegistry {
    fn lookup_flow(&self, substance: Substance, _medium: Medium) -> Result<FlowRef, EngineError> {
        self.lookup(substance)
    }

    fn score(&self, _inventory: &Inventory, category: ImpactCategory) -> Result<f64, EngineError> {
        Err(EngineError::Config(format!(
            "scoring '{}' requires an external LCA backend",
            category.display_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory;

    #[test]
    fn registry_resolves_every_substance() {
        let registry = FlowRegistry;
        let refs: std::collections::BTreeSet<String> = [
            Substance::Co2Fossil,
            Substance::Co2Biogenic,
            Substance::Ch4Fossil,
            Substance::Nox,
            Substance::So2,
            Substance::Pm10,
            Substance::Pm25,
            Substance::Hg,
            Substance::Pb,
            Substance::Dioxin,
            Substance::Pahs,
            Substance::Nmvoc,
            Substance::Nh3,
            Substance::Hcl,
            Substance::Cl2,
        ]
        .into_iter()
        .map(|s| registry.lookup(s).unwrap().uuid)
        .collect();
        // All UUIDs distinct.
        assert_eq!(refs.len(), 15);
    }

    #[test]
    fn registry_refuses_to_score() {
        let registry = FlowRegistry;
        let inv = inventory::aggregate("H1", "BASELINE", &[], &[]).unwrap();
        assert!(registry.score(&inv, ImpactCategory::ClimateChange).is_err());
    }

    /// A backend double with flat characterization factors, standing in for
    /// the external engine.
    struct FlatBackend;

    impl ImpactBackend for FlatBackend {
        fn lookup_flow(&self, substance: Substance, _: Medium) -> Result<FlowRef, EngineError> {
            FlowRegistry.lookup(substance)
        }

        fn score(&self, inventory: &Inventory, _: ImpactCategory) -> Result<f64, EngineError> {
            Ok(inventory.total_kg())
        }
    }

    #[test]
    fn backend_trait_is_object_safe_and_swappable() {
        use crate::domain::{EmissionRecord, Medium};
        use crate::units::Quantity;

        let record = EmissionRecord::new(
            Substance::Co2Fossil,
            Quantity::kilograms(10.0),
            Medium::Air,
            "incineration",
            false,
        )
        .unwrap();
        let inv = inventory::aggregate("H1", "BASELINE", &[record], &[]).unwrap();

        let backend: &dyn ImpactBackend = &FlatBackend;
        let score = backend.score(&inv, ImpactCategory::ClimateChange).unwrap();
        assert!((score - 10.0).abs() < 1e-12);
    }
}
