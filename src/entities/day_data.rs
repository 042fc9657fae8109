//! Per-UTC-day vault rollups.

use serde::Serialize;

use crate::domain::{Amount, TimeMs};

/// One row per UTC day per vault.
///
/// `total_returns_generated` is cumulative, found by walking backward
/// through prior days up to a bounded search depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultDayData {
    pub id: String,
    pub vault: String,
    /// Millisecond timestamp of the day's start.
    pub timestamp: TimeMs,
    pub day_index: i64,
    pub price_per_share: Amount,
    pub deposited: Amount,
    pub withdrawn: Amount,
    pub day_returns_generated: Amount,
    pub total_returns_generated: Amount,
    pub day_returns_generated_usd: Amount,
    pub total_returns_generated_usd: Amount,
    pub token_price_usd: Amount,
}

impl VaultDayData {
    /// `{vaultAddr}-{dayIndex}`
    pub fn build_id(vault_id: &str, day_index: i64) -> String {
        format!("{}-{}", vault_id, day_index)
    }
}
