//! In-memory id-indexed entity store.
//!
//! The projection is a single-threaded fold; every transition is a
//! read-modify-write against a small, explicitly enumerated set of
//! entities. BTreeMaps keep iteration (and therefore persistence) order
//! deterministic.

use std::collections::BTreeMap;

use crate::domain::Address;
use crate::entities::{
    Account, AccountVaultPosition, AccountVaultPositionUpdate, Deposit, Harvest, Registry,
    Strategy, StrategyMigration, StrategyReport, StrategyReportResult, Token, TokenFee,
    Transaction, Transfer, Vault, VaultDayData, VaultUpdate, Withdrawal,
};

#[derive(Debug, Default)]
pub struct EntityStore {
    pub accounts: BTreeMap<String, Account>,
    pub tokens: BTreeMap<String, Token>,
    pub transactions: BTreeMap<String, Transaction>,
    pub vaults: BTreeMap<String, Vault>,
    pub vault_updates: BTreeMap<String, VaultUpdate>,
    pub strategies: BTreeMap<String, Strategy>,
    pub strategy_reports: BTreeMap<String, StrategyReport>,
    pub strategy_report_results: BTreeMap<String, StrategyReportResult>,
    pub harvests: BTreeMap<String, Harvest>,
    pub strategy_migrations: BTreeMap<String, StrategyMigration>,
    pub deposits: BTreeMap<String, Deposit>,
    pub withdrawals: BTreeMap<String, Withdrawal>,
    pub transfers: BTreeMap<String, Transfer>,
    pub positions: BTreeMap<String, AccountVaultPosition>,
    pub position_updates: BTreeMap<String, AccountVaultPositionUpdate>,
    pub token_fees: BTreeMap<String, TokenFee>,
    pub vault_day_data: BTreeMap<String, VaultDayData>,
    pub registries: BTreeMap<String, Registry>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this address is a vault the projection has seen.
    pub fn is_vault(&self, address: &Address) -> bool {
        self.vaults.contains_key(&Vault::build_id(address))
    }

    /// Whether this address is a strategy the projection has seen.
    pub fn is_strategy(&self, address: &Address) -> bool {
        self.strategies.contains_key(&Strategy::build_id(address))
    }

    /// Total number of entities, across all families.
    pub fn entity_count(&self) -> usize {
        self.accounts.len()
            + self.tokens.len()
            + self.transactions.len()
            + self.vaults.len()
            + self.vault_updates.len()
            + self.strategies.len()
            + self.strategy_reports.len()
            + self.strategy_report_results.len()
            + self.harvests.len()
            + self.strategy_migrations.len()
            + self.deposits.len()
            + self.withdrawals.len()
            + self.transfers.len()
            + self.positions.len()
            + self.position_updates.len()
            + self.token_fees.len()
            + self.vault_day_data.len()
            + self.registries.len()
    }
}
