//! Per-vault fee accounting.

use serde::Serialize;

use crate::domain::Amount;

/// Two-phase fee ledger for one vault.
///
/// Fee-classified transfers accrue into the `unrecognized_*` balances; the
/// next strategy report moves them into the cumulative totals and zeroes
/// the unrecognized side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenFee {
    /// Keyed by vault id.
    pub id: String,
    pub vault: String,
    pub token: String,
    pub unrecognized_strategy_fees: Amount,
    pub unrecognized_treasury_fees: Amount,
    pub total_strategy_fees: Amount,
    pub total_treasury_fees: Amount,
    pub total_fees: Amount,
}

impl TokenFee {
    pub fn build_id(vault_id: &str) -> String {
        vault_id.to_string()
    }

    pub fn new(vault_id: &str, token_id: &str) -> Self {
        TokenFee {
            id: Self::build_id(vault_id),
            vault: vault_id.to_string(),
            token: token_id.to_string(),
            unrecognized_strategy_fees: Amount::zero(),
            unrecognized_treasury_fees: Amount::zero(),
            total_strategy_fees: Amount::zero(),
            total_treasury_fees: Amount::zero(),
            total_fees: Amount::zero(),
        }
    }
}
