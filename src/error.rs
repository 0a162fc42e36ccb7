//! Library-wide error taxonomy.
//!
//! Every failure mode of the calculation engine maps onto one of these
//! variants; the binary turns them into process exit codes. Errors carry
//! enough context to identify the offending (process, substance, category)
//! without the caller re-deriving it.

use thiserror::Error;

use crate::domain::{ProcessKind, Substance, WasteCategory};
use crate::units::Unit;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Invalid configuration: bad segregation efficiency, unknown override
    /// key, malformed composition, out-of-range constants.
    #[error("configuration error: {0}")]
    Config(String),

    /// A treatment process was handed a waste category it cannot model.
    #[error("{process} cannot treat waste category '{category}'")]
    UnsupportedCategory {
        process: ProcessKind,
        category: WasteCategory,
    },

    /// Incompatible dimensions in a unit conversion.
    #[error("unit mismatch: cannot convert {from} to {to}")]
    UnitMismatch { from: Unit, to: Unit },

    /// No base emission factor defined for a (process, substance) pair.
    ///
    /// A missing factor is always an error, never a silent zero.
    #[error("no base emission factor for {process}/{substance}")]
    MissingFactor {
        process: ProcessKind,
        substance: Substance,
    },

    /// Records could not be reconciled during inventory aggregation.
    #[error("aggregation error: {0}")]
    Aggregation(String),

    /// File or serialization failure at an import/export boundary.
    #[error("{0}")]
    Io(String),
}

impl EngineError {
    /// Exit code used by the `hbw` binary.
    ///
    /// 2 = configuration / IO, 3 = data (unsupported category, missing
    /// factor), 4 = internal (unit or aggregation inconsistency).
    pub fn exit_code(&self) -> u8 {
        match self {
            EngineError::Config(_) | EngineError::Io(_) => 2,
            EngineError::UnsupportedCategory { .. } | EngineError::MissingFactor { .. } => 3,
            EngineError::UnitMismatch { .. } | EngineError::Aggregation(_) => 4,
        }
    }
}
