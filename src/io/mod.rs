//! Import/export of batch results.

pub mod export;
pub mod inventory;
