//! Per-account holdings: positions, position updates, deposits,
//! withdrawals and share transfers.

use serde::Serialize;

use crate::domain::{Amount, TimeMs};

/// An account's current running balance in one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountVaultPosition {
    pub id: String,
    pub account: String,
    pub vault: String,
    pub token: String,
    pub share_token: String,
    /// Transaction that created the position.
    pub transaction: String,
    pub balance_shares: Amount,
    pub balance_tokens: Amount,
    pub balance_profit: Amount,
    /// Back-reference to the most recent AccountVaultPositionUpdate.
    pub latest_update: Option<String>,
    /// Number of updates written so far; the next update's ordinal.
    pub update_count: u64,
}

impl AccountVaultPosition {
    /// `{accountAddr}-{vaultAddr}`
    pub fn build_id(account_id: &str, vault_id: &str) -> String {
        format!("{}-{}", account_id, vault_id)
    }
}

/// Append-only snapshot of a position after one causing event.
///
/// Counter fields are cumulative over the life of the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountVaultPositionUpdate {
    pub id: String,
    /// Per-position monotonically increasing sequence number.
    pub order: u64,
    pub account: String,
    pub vault: String,
    pub position: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub deposits: Amount,
    pub withdrawals: Amount,
    pub shares_minted: Amount,
    pub shares_burnt: Amount,
    pub shares_sent: Amount,
    pub shares_received: Amount,
    pub tokens_sent: Amount,
    pub tokens_received: Amount,
    pub balance_shares: Amount,
    pub balance_position: Amount,
}

impl AccountVaultPositionUpdate {
    /// `{accountAddr}-{vaultAddr}-{ordinal}`
    pub fn build_id(account_id: &str, vault_id: &str, order: u64) -> String {
        format!("{}-{}-{}", account_id, vault_id, order)
    }
}

/// Immutable record of a single deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deposit {
    pub id: String,
    pub account: String,
    pub vault: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub token_amount: Amount,
    pub shares_minted: Amount,
    /// Zero when no price source resolved.
    pub token_amount_usd: Amount,
}

impl Deposit {
    /// `{accountAddr}-{txHashHex}-{logIndex}-{txIndex}`
    pub fn build_id(account_id: &str, transaction_id: &str, tx_index: u64) -> String {
        format!("{}-{}-{}", account_id, transaction_id, tx_index)
    }
}

/// Immutable record of a single withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Withdrawal {
    pub id: String,
    pub account: String,
    pub vault: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub token_amount: Amount,
    pub shares_burnt: Amount,
    pub token_amount_usd: Amount,
}

impl Withdrawal {
    /// Same shape as [`Deposit::build_id`].
    pub fn build_id(account_id: &str, transaction_id: &str, tx_index: u64) -> String {
        format!("{}-{}-{}", account_id, transaction_id, tx_index)
    }
}

/// A share transfer between two accounts (excluding mint/burn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub id: String,
    pub from: String,
    pub to: String,
    pub vault: String,
    pub token: String,
    pub token_amount: Amount,
    pub token_amount_usd: Amount,
    pub share_token: String,
    pub share_amount: Amount,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub is_fee_to_strategy: bool,
    pub is_fee_to_treasury: bool,
}

impl Transfer {
    /// `{fromAccountId}-{toAccountId}-{transactionId}`
    pub fn build_id(from_account_id: &str, to_account_id: &str, transaction_id: &str) -> String {
        format!("{}-{}-{}", from_account_id, to_account_id, transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_id_format() {
        assert_eq!(
            AccountVaultPosition::build_id("0xaccount", "0xvault"),
            "0xaccount-0xvault"
        );
    }

    #[test]
    fn test_position_update_ordinal_id() {
        assert_eq!(
            AccountVaultPositionUpdate::build_id("0xaccount", "0xvault", 0),
            "0xaccount-0xvault-0"
        );
        assert_eq!(
            AccountVaultPositionUpdate::build_id("0xaccount", "0xvault", 17),
            "0xaccount-0xvault-17"
        );
    }

    #[test]
    fn test_deposit_id_format() {
        assert_eq!(
            Deposit::build_id("0xaccount", "0xhash-2", 5),
            "0xaccount-0xhash-2-5"
        );
    }

    #[test]
    fn test_transfer_id_format() {
        assert_eq!(
            Transfer::build_id("0xfrom", "0xto", "0xhash-1"),
            "0xfrom-0xto-0xhash-1"
        );
    }
}
