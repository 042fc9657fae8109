//! VaultUpdate construction.
//!
//! Every state-changing vault event writes one immutable VaultUpdate and
//! applies the matching signed deltas to the vault's running totals,
//! exactly once. `total_fees` accumulates across the update chain:
//! `totalFees(n) = totalFees(n-1) + feesPaid`.

use tracing::{debug, warn};

use crate::chain::{amount_or_zero, ChainState};
use crate::domain::{Address, Amount};
use crate::engine::{day_data, fees};
use crate::entities::{Transaction, Vault, VaultUpdate};
use crate::pricing::UsdPriceResolver;
use crate::store::EntityStore;

/// Deltas and "what changed" fields for one vault update.
#[derive(Debug, Clone, Default)]
pub struct UpdateDeltas {
    pub tokens_deposited: Amount,
    pub tokens_withdrawn: Amount,
    pub shares_minted: Amount,
    pub shares_burnt: Amount,
    pub returns_generated: Amount,
    pub fees_paid: Option<Amount>,
    pub new_management_fee: Option<Amount>,
    pub new_performance_fee: Option<Amount>,
    pub new_rewards: Option<Address>,
    pub new_health_check: Option<Address>,
    pub health_check_cleared: bool,
}

/// Create the update row, fold the deltas into the vault, and feed the
/// day-bucket aggregator. Re-delivery of the same event (same update id)
/// is a no-op returning the existing row.
pub fn create_vault_update(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_id: &str,
    tx: &Transaction,
    balance_position: Amount,
    deltas: UpdateDeltas,
) -> Option<VaultUpdate> {
    let Some(mut vault) = store.vaults.get(vault_id).cloned() else {
        warn!(vault = %vault_id, tx = %tx.id, "vault update against unknown vault");
        return None;
    };

    let id = VaultUpdate::build_id(vault_id, &tx.id, tx.tx_index);
    if let Some(existing) = store.vault_updates.get(&id) {
        debug!(id = %id, "vault update already exists, not re-applying");
        return Some(existing.clone());
    }

    let previous_total_fees = vault
        .latest_update
        .as_ref()
        .and_then(|update_id| store.vault_updates.get(update_id))
        .map(|update| update.total_fees.clone())
        .unwrap_or_else(Amount::zero);
    let total_fees = match &deltas.fees_paid {
        Some(paid) => &previous_total_fees + paid,
        None => previous_total_fees,
    };

    let price_per_share = amount_or_zero(chain.price_per_share(&vault.address));
    let new_balance_tokens = &(&(&vault.balance_tokens + &deltas.tokens_deposited)
        - &deltas.tokens_withdrawn)
        + &deltas.returns_generated;
    // Snapshot the chain's totalAssets when readable, otherwise fall back
    // to the delta-derived running total.
    let current_balance_tokens = chain
        .total_assets(&vault.address)
        .unwrap_or_else(|_| new_balance_tokens.clone());

    let update = VaultUpdate {
        id: id.clone(),
        vault: vault_id.to_string(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        tokens_deposited: deltas.tokens_deposited.clone(),
        tokens_withdrawn: deltas.tokens_withdrawn.clone(),
        shares_minted: deltas.shares_minted.clone(),
        shares_burnt: deltas.shares_burnt.clone(),
        balance_position,
        returns_generated: deltas.returns_generated.clone(),
        total_fees,
        price_per_share,
        current_balance_tokens,
        new_management_fee: deltas.new_management_fee.clone(),
        new_performance_fee: deltas.new_performance_fee.clone(),
        new_rewards: deltas.new_rewards.clone(),
        new_health_check: deltas.new_health_check.clone(),
        health_check_cleared: deltas.health_check_cleared,
    };
    store.vault_updates.insert(id.clone(), update.clone());

    vault.latest_update = Some(id);
    vault.balance_tokens = new_balance_tokens;
    vault.balance_tokens_idle = &(&vault.balance_tokens_idle + &deltas.tokens_deposited)
        - &deltas.tokens_withdrawn;
    vault.shares_supply =
        &(&vault.shares_supply + &deltas.shares_minted) - &deltas.shares_burnt;
    vault.available_deposit_limit = if vault.deposit_limit <= vault.balance_tokens {
        Amount::zero()
    } else {
        &vault.deposit_limit - &vault.balance_tokens
    };
    store.vaults.insert(vault.id.clone(), vault);

    day_data::update_vault_day_data(store, chain, prices, &update);

    Some(update)
}

#[allow(clippy::too_many_arguments)]
pub fn deposit(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    deposited_amount: &Amount,
    shares_minted: &Amount,
    balance_position: Amount,
) -> Option<VaultUpdate> {
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            tokens_deposited: deposited_amount.clone(),
            shares_minted: shares_minted.clone(),
            ..Default::default()
        },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    withdrawn_amount: &Amount,
    shares_burnt: &Amount,
    balance_position: Amount,
) -> Option<VaultUpdate> {
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            tokens_withdrawn: withdrawn_amount.clone(),
            shares_burnt: shares_burnt.clone(),
            ..Default::default()
        },
    )
}

/// Recognize the fees accrued since the last report, then write an update
/// carrying the net returns and the fees paid during this report.
pub fn strategy_reported(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    balance_position: Amount,
    gross_returns_generated: &Amount,
) -> Option<VaultUpdate> {
    let fees_to_treasury = fees::recognize_treasury_fees(store, vault);
    let fees_to_strategist = fees::recognize_strategy_fees(store, vault);
    let fees_paid = &fees_to_treasury + &fees_to_strategist;
    let net_returns = gross_returns_generated - &fees_paid;

    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            returns_generated: net_returns,
            fees_paid: Some(fees_paid),
            ..Default::default()
        },
    )
}

pub fn performance_fee_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    balance_position: Amount,
    performance_fee: &Amount,
) -> Option<VaultUpdate> {
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            new_performance_fee: Some(performance_fee.clone()),
            ..Default::default()
        },
    )
}

pub fn management_fee_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    balance_position: Amount,
    management_fee: &Amount,
) -> Option<VaultUpdate> {
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            new_management_fee: Some(management_fee.clone()),
            ..Default::default()
        },
    )
}

pub fn rewards_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    balance_position: Amount,
    rewards: &Address,
) -> Option<VaultUpdate> {
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            new_rewards: Some(rewards.clone()),
            ..Default::default()
        },
    )
}

pub fn health_check_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault: &Vault,
    tx: &Transaction,
    health_check: Option<Address>,
) -> Option<VaultUpdate> {
    let balance_position = vault
        .latest_update
        .as_ref()
        .and_then(|update_id| store.vault_updates.get(update_id))
        .map(|update| update.balance_position.clone())
        .unwrap_or_else(Amount::zero);
    let cleared = health_check.is_none();
    create_vault_update(
        store,
        chain,
        prices,
        &vault.id,
        tx,
        balance_position,
        UpdateDeltas {
            new_health_check: health_check,
            health_check_cleared: cleared,
            ..Default::default()
        },
    )
}
