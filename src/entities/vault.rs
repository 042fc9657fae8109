//! Vault and VaultUpdate entities.

use serde::Serialize;

use crate::domain::{Address, Amount, TimeMs};

/// Where a vault sits in the registry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VaultClassification {
    Experimental,
    Endorsed,
    Released,
}

impl VaultClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaultClassification::Experimental => "Experimental",
            VaultClassification::Endorsed => "Endorsed",
            VaultClassification::Released => "Released",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Experimental" => Some(VaultClassification::Experimental),
            "Endorsed" => Some(VaultClassification::Endorsed),
            "Released" => Some(VaultClassification::Released),
            _ => None,
        }
    }
}

impl std::fmt::Display for VaultClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A share-based pooled-asset vault.
///
/// `shares_supply`, `balance_tokens` and `balance_tokens_idle` are running
/// totals maintained as signed deltas, applied exactly once per causing
/// event. `balance_tokens_idle` deliberately ignores debt issued to
/// strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vault {
    pub id: String,
    pub address: Address,
    /// Underlying token entity id.
    pub token: String,
    /// Share token entity id (the vault's own address).
    pub share_token: String,
    pub registry: Option<String>,
    pub classification: VaultClassification,
    pub api_version: String,
    /// Transaction that created the entity.
    pub transaction: String,
    pub tags: Vec<String>,
    pub balance_tokens: Amount,
    pub balance_tokens_idle: Amount,
    pub shares_supply: Amount,
    pub deposit_limit: Amount,
    pub available_deposit_limit: Amount,
    pub management_fee_bps: u32,
    pub performance_fee_bps: u32,
    pub rewards: Address,
    pub management: Address,
    pub guardian: Address,
    pub governance: Address,
    pub health_check: Option<Address>,
    pub activation: Amount,
    /// Ordered strategy ids the vault drains from to satisfy withdrawals.
    pub withdrawal_queue: Vec<String>,
    /// Back-reference to the most recent VaultUpdate.
    pub latest_update: Option<String>,
}

impl Vault {
    pub fn build_id(address: &Address) -> String {
        address.to_string()
    }
}

/// Immutable per-event snapshot of a vault state change, chained backward
/// through `Vault.latest_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultUpdate {
    pub id: String,
    pub vault: String,
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    // Deltas caused by this event.
    pub tokens_deposited: Amount,
    pub tokens_withdrawn: Amount,
    pub shares_minted: Amount,
    pub shares_burnt: Amount,
    // Running state at this point in time.
    pub balance_position: Amount,
    pub returns_generated: Amount,
    pub total_fees: Amount,
    pub price_per_share: Amount,
    pub current_balance_tokens: Amount,
    // "What changed" fields; None when this update's cause was unrelated.
    pub new_management_fee: Option<Amount>,
    pub new_performance_fee: Option<Amount>,
    pub new_rewards: Option<Address>,
    pub new_health_check: Option<Address>,
    pub health_check_cleared: bool,
}

impl VaultUpdate {
    /// `{vaultAddr}-{txHashHex}-{logIndex}-{txIndex}`
    pub fn build_id(vault_id: &str, transaction_id: &str, tx_index: u64) -> String {
        format!("{}-{}-{}", vault_id, transaction_id, tx_index)
    }
}
