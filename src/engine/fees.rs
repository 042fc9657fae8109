//! Per-vault fee ledger.
//!
//! Fee-classified share transfers accrue raw (non-USD) amounts into the
//! unrecognized balances; the next strategy report recognizes them into
//! the cumulative totals. Recognition must happen exactly once per report
//! event; that discipline belongs to the caller.

use tracing::warn;

use crate::domain::Amount;
use crate::entities::{TokenFee, Vault};
use crate::store::EntityStore;

/// How a share transfer was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    StrategyFee,
    TreasuryFee,
    Plain,
}

impl TransferKind {
    pub fn is_fee_to_strategy(&self) -> bool {
        matches!(self, TransferKind::StrategyFee)
    }

    pub fn is_fee_to_treasury(&self) -> bool {
        matches!(self, TransferKind::TreasuryFee)
    }
}

/// Classify a transfer by its recipient and accrue the amount when it is a
/// fee. A recipient that is a known strategy is a strategist fee; a
/// recipient equal to the vault's rewards address is a treasury fee.
pub fn classify_and_accrue(
    store: &mut EntityStore,
    vault: &Vault,
    to_account_id: &str,
    amount: &Amount,
) -> TransferKind {
    if store.strategies.contains_key(to_account_id) {
        let mut fee = get_or_create_token_fee(store, vault);
        fee.unrecognized_strategy_fees = &fee.unrecognized_strategy_fees + amount;
        store.token_fees.insert(fee.id.clone(), fee);
        return TransferKind::StrategyFee;
    }
    if to_account_id == vault.rewards.as_str() {
        let mut fee = get_or_create_token_fee(store, vault);
        fee.unrecognized_treasury_fees = &fee.unrecognized_treasury_fees + amount;
        store.token_fees.insert(fee.id.clone(), fee);
        return TransferKind::TreasuryFee;
    }
    TransferKind::Plain
}

/// Move unrecognized strategist fees into the cumulative totals, returning
/// the amount recognized.
pub fn recognize_strategy_fees(store: &mut EntityStore, vault: &Vault) -> Amount {
    let mut fee = load_or_warn(store, vault);
    let newly_recognized = fee.unrecognized_strategy_fees.clone();
    fee.total_strategy_fees = &fee.total_strategy_fees + &newly_recognized;
    fee.total_fees = &fee.total_fees + &newly_recognized;
    fee.unrecognized_strategy_fees = Amount::zero();
    store.token_fees.insert(fee.id.clone(), fee);
    newly_recognized
}

/// Move unrecognized treasury fees into the cumulative totals, returning
/// the amount recognized.
pub fn recognize_treasury_fees(store: &mut EntityStore, vault: &Vault) -> Amount {
    let mut fee = load_or_warn(store, vault);
    let newly_recognized = fee.unrecognized_treasury_fees.clone();
    fee.total_treasury_fees = &fee.total_treasury_fees + &newly_recognized;
    fee.total_fees = &fee.total_fees + &newly_recognized;
    fee.unrecognized_treasury_fees = Amount::zero();
    store.token_fees.insert(fee.id.clone(), fee);
    newly_recognized
}

fn load_or_warn(store: &mut EntityStore, vault: &Vault) -> TokenFee {
    let id = TokenFee::build_id(&vault.id);
    match store.token_fees.get(&id) {
        Some(fee) => fee.clone(),
        None => {
            warn!(vault = %vault.id, "no token fee record when recognizing fees");
            let fee = TokenFee::new(&vault.id, &vault.token);
            store.token_fees.insert(id, fee.clone());
            fee
        }
    }
}

fn get_or_create_token_fee(store: &mut EntityStore, vault: &Vault) -> TokenFee {
    let id = TokenFee::build_id(&vault.id);
    match store.token_fees.get(&id) {
        Some(fee) => fee.clone(),
        None => {
            let fee = TokenFee::new(&vault.id, &vault.token);
            store.token_fees.insert(id, fee.clone());
            fee
        }
    }
}
