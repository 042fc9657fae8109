//! SQLite persistence.

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{PositionRow, Repository, VaultDayDataRow, VaultRow, VaultUpdateRow};
