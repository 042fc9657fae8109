//! The projected entity graph.
//!
//! Every entity is keyed by a deterministic string identifier built from
//! chain primitives, never by a surrogate id; re-applying the same record
//! yields the same key. "Update"-suffixed entities are created once per
//! causing event, never mutated afterwards, and chained backward off the
//! parent's `latest_*` pointer.

pub mod day_data;
pub mod fees;
pub mod position;
pub mod registry;
pub mod strategy;
pub mod transaction;
pub mod vault;

pub use day_data::VaultDayData;
pub use fees::TokenFee;
pub use position::{
    AccountVaultPosition, AccountVaultPositionUpdate, Deposit, Transfer, Withdrawal,
};
pub use registry::Registry;
pub use strategy::{Harvest, Strategy, StrategyMigration, StrategyReport, StrategyReportResult};
pub use transaction::{Account, Token, Transaction};
pub use vault::{Vault, VaultClassification, VaultUpdate};
