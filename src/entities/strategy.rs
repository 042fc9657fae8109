//! Strategy lifecycle entities.

use serde::Serialize;

use crate::domain::{Address, Amount, TimeMs};

/// A yield-generating module attached to a vault.
///
/// For v2 vaults `debt_limit` carries the debt ratio and `rate_limit` is
/// zero; see the record-model normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub id: String,
    pub address: Address,
    pub vault: String,
    pub name: String,
    pub api_version: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub debt_limit: Amount,
    pub rate_limit: Amount,
    pub min_debt_per_harvest: Amount,
    pub max_debt_per_harvest: Amount,
    pub performance_fee_bps: Amount,
    pub keeper: Address,
    pub strategist: Address,
    pub rewards: Address,
    pub emergency_exit: bool,
    pub health_check: Option<Address>,
    pub do_health_check: bool,
    pub in_queue: bool,
    pub cloned_from: Option<String>,
    /// Back-reference to the most recent StrategyReport.
    pub latest_report: Option<String>,
}

impl Strategy {
    pub fn build_id(address: &Address) -> String {
        address.to_string()
    }
}

/// One harvest-report settlement, as reported by the vault. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReport {
    pub id: String,
    pub strategy: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub gain: Amount,
    pub loss: Amount,
    pub total_gain: Amount,
    pub total_loss: Amount,
    pub total_debt: Amount,
    pub debt_added: Amount,
    pub debt_limit: Amount,
    pub debt_paid: Amount,
}

impl StrategyReport {
    /// `{strategyAddr}-{transactionId}`
    pub fn build_id(strategy_id: &str, transaction_id: &str) -> String {
        format!("{}-{}", strategy_id, transaction_id)
    }
}

/// Diff of two consecutive reports for one strategy; created only when a
/// prior report exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReportResult {
    pub id: String,
    pub strategy: String,
    pub prior_report: String,
    pub latest_report: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    /// Milliseconds between the two reports.
    pub duration_ms: i64,
    pub total_gain_delta: Amount,
    pub total_loss_delta: Amount,
    pub total_debt_delta: Amount,
}

impl StrategyReportResult {
    /// `{priorReportId}-{latestReportId}`
    pub fn build_id(prior_report_id: &str, latest_report_id: &str) -> String {
        format!("{}-{}", prior_report_id, latest_report_id)
    }
}

/// One harvest execution on the strategy contract. Idempotent by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Harvest {
    pub id: String,
    pub strategy: String,
    pub vault: String,
    pub harvester: Address,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub profit: Amount,
    pub loss: Amount,
    pub debt_payment: Amount,
    pub debt_outstanding: Amount,
}

impl Harvest {
    /// `{strategyAddr}-{txHashHex}-{txIndex}`
    pub fn build_id(strategy_id: &str, tx_hash: &str, tx_index: u64) -> String {
        format!("{}-{}-{}", strategy_id, tx_hash, tx_index)
    }
}

/// One-time replacement relationship between two strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyMigration {
    pub id: String,
    pub old_strategy: String,
    pub new_strategy: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
}

impl StrategyMigration {
    /// `{oldAddr}-{newAddr}`
    pub fn build_id(old_strategy_id: &str, new_strategy_id: &str) -> String {
        format!("{}-{}", old_strategy_id, new_strategy_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_id_uses_tx_index_not_log_index() {
        assert_eq!(
            Harvest::build_id("0xstrategy", "0xhash", 4),
            "0xstrategy-0xhash-4"
        );
    }

    #[test]
    fn test_migration_id_format() {
        assert_eq!(
            StrategyMigration::build_id("0xold", "0xnew"),
            "0xold-0xnew"
        );
    }
}
