//! The projection core.
//!
//! A deterministic fold over an ordered stream of decoded records:
//! transaction resolution, the fee ledger, vault and strategy projection,
//! day-bucket aggregation, and the version/feature gate for legacy calls.

pub mod day_data;
pub mod fees;
pub mod filters;
pub mod position;
pub mod projector;
pub mod registry;
pub mod strategy;
pub mod transaction;
pub mod transfer;
pub mod vault;
pub mod vault_update;

pub use fees::TransferKind;
pub use projector::Projector;
