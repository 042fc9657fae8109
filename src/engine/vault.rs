//! Vault projection: the transitions applied per vault event.

use tracing::{debug, info, warn};

use crate::chain::{address_or_zero, amount_or_zero, string_or, ChainState};
use crate::domain::{Address, Amount};
use crate::engine::{position, transaction, transfer, vault_update};
use crate::entities::{
    AccountVaultPosition, Deposit, StrategyReport, Transaction, Vault, VaultClassification,
    Withdrawal,
};
use crate::pricing::UsdPriceResolver;
use crate::store::EntityStore;

fn bps(result: crate::chain::CallResult<Amount>) -> u32 {
    amount_or_zero(result).to_u64().unwrap_or(0) as u32
}

/// `totalAssets * pricePerShare / 10^decimals`, zero when unreadable.
fn balance_position(store: &EntityStore, chain: &dyn ChainState, vault_address: &Address) -> Amount {
    let total_assets = amount_or_zero(chain.total_assets(vault_address));
    let price_per_share = match chain.price_per_share(vault_address) {
        Ok(value) => value,
        Err(_) => {
            warn!(vault = %vault_address, "pricePerShare read reverted");
            Amount::zero()
        }
    };
    let decimals = crate::pricing::token_decimals(store, chain, vault_address);
    total_assets.mul_div(&price_per_share, &Amount::pow10(decimals))
}

fn create_vault_entity(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    vault_address: &Address,
    tx: &Transaction,
) -> Vault {
    let underlying_address = address_or_zero(chain.token(vault_address));
    let token = transaction::get_or_create_token(store, chain, &underlying_address);
    let share_token = transaction::get_or_create_token(store, chain, vault_address);
    let deposit_limit = amount_or_zero(chain.deposit_limit(vault_address));

    Vault {
        id: Vault::build_id(vault_address),
        address: vault_address.clone(),
        token: token.id,
        share_token: share_token.id,
        registry: None,
        classification: VaultClassification::Experimental,
        api_version: string_or(chain.api_version(vault_address), "0"),
        transaction: tx.id.clone(),
        tags: vec![],
        balance_tokens: Amount::zero(),
        balance_tokens_idle: Amount::zero(),
        shares_supply: Amount::zero(),
        available_deposit_limit: deposit_limit.clone(),
        deposit_limit,
        management_fee_bps: bps(chain.management_fee(vault_address)),
        performance_fee_bps: bps(chain.performance_fee(vault_address)),
        rewards: address_or_zero(chain.rewards(vault_address)),
        management: address_or_zero(chain.management(vault_address)),
        guardian: address_or_zero(chain.guardian(vault_address)),
        governance: address_or_zero(chain.governance(vault_address)),
        health_check: None,
        activation: amount_or_zero(chain.activation(vault_address)),
        withdrawal_queue: vec![],
        latest_update: None,
    }
}

pub fn get_or_create_vault(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    vault_address: &Address,
    tx: &Transaction,
) -> Vault {
    let id = Vault::build_id(vault_address);
    if let Some(existing) = store.vaults.get(&id) {
        return existing.clone();
    }
    debug!(vault = %id, "creating vault");
    let vault = create_vault_entity(store, chain, vault_address, tx);
    store.vaults.insert(id, vault.clone());
    vault
}

/// Registry-driven creation: sets classification, registry and version.
/// An experimental vault later endorsed keeps one entity and flips its
/// classification.
pub fn create_registered_vault(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    registry_id: &str,
    vault_address: &Address,
    classification: VaultClassification,
    api_version: &str,
    tx: &Transaction,
) -> Vault {
    let id = Vault::build_id(vault_address);
    let mut vault = match store.vaults.get(&id) {
        Some(existing) => {
            let mut vault = existing.clone();
            if vault.classification != classification {
                info!(
                    vault = %id, from = %vault.classification, to = %classification,
                    "reclassifying vault"
                );
                vault.classification = classification;
            }
            vault
        }
        None => {
            info!(vault = %id, %classification, "creating registered vault");
            let mut vault = create_vault_entity(store, chain, vault_address, tx);
            vault.classification = classification;
            vault.api_version = api_version.to_string();
            vault
        }
    };
    vault.registry = Some(registry_id.to_string());
    store.vaults.insert(id, vault.clone());
    vault
}

/// Back-derive a deposited amount from minted shares via
/// `sharesMinted * totalAssets / totalSupply`.
pub fn calculate_amount_deposited(
    chain: &dyn ChainState,
    vault_address: &Address,
    shares_minted: &Amount,
) -> Amount {
    let total_assets = amount_or_zero(chain.total_assets(vault_address));
    let total_supply = amount_or_zero(chain.total_supply(vault_address));
    let amount = shares_minted.mul_div(&total_assets, &total_supply);
    info!(
        shares = %shares_minted, %total_assets, %total_supply, %amount,
        "indirectly calculated deposited token quantity"
    );
    amount
}

#[allow(clippy::too_many_arguments)]
pub fn deposit(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    tx: &Transaction,
    receiver: &Address,
    deposited_amount: &Amount,
    shares_minted: &Amount,
) {
    debug!(
        vault = %vault_address, receiver = %receiver,
        amount = %deposited_amount, shares = %shares_minted,
        "deposit"
    );
    let account = transaction::get_or_create_account(store, receiver);
    let vault = get_or_create_vault(store, chain, vault_address, tx);

    let deposit_id = Deposit::build_id(&account.id, &tx.id, tx.tx_index);
    if store.deposits.contains_key(&deposit_id) {
        debug!(id = %deposit_id, "deposit already recorded, skipping");
        return;
    }

    position::deposit(
        store,
        chain,
        &account,
        &vault,
        tx,
        deposited_amount,
        shares_minted,
    );

    let token_address = Address::parse(&vault.token).unwrap_or_else(|_| Address::zero());
    let token_amount_usd = prices.resolve(store, chain, &token_address, deposited_amount);
    let record = Deposit {
        id: deposit_id.clone(),
        account: account.id.clone(),
        vault: vault.id.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        token_amount: deposited_amount.clone(),
        shares_minted: shares_minted.clone(),
        token_amount_usd,
    };
    store.deposits.insert(deposit_id, record);

    let balance = balance_position(store, chain, vault_address);
    vault_update::deposit(
        store,
        chain,
        prices,
        &vault,
        tx,
        deposited_amount,
        shares_minted,
        balance,
    );
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    from: &Address,
    withdrawn_amount: &Amount,
    shares_burnt: &Amount,
    tx: &Transaction,
) {
    let account = transaction::get_or_create_account(store, from);
    let vault = get_or_create_vault(store, chain, vault_address, tx);

    let withdrawal_id = Withdrawal::build_id(&account.id, &tx.id, tx.tx_index);
    if store.withdrawals.contains_key(&withdrawal_id) {
        debug!(id = %withdrawal_id, "withdrawal already recorded, skipping");
        return;
    }

    let token_address = Address::parse(&vault.token).unwrap_or_else(|_| Address::zero());
    let token_amount_usd = prices.resolve(store, chain, &token_address, withdrawn_amount);
    let record = Withdrawal {
        id: withdrawal_id.clone(),
        account: account.id.clone(),
        vault: vault.id.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        token_amount: withdrawn_amount.clone(),
        shares_burnt: shares_burnt.clone(),
        token_amount_usd,
    };
    store.withdrawals.insert(withdrawal_id.clone(), record);

    let position_id = AccountVaultPosition::build_id(&account.id, &vault.id);
    match store.positions.get(&position_id).cloned() {
        Some(existing) => {
            position::withdraw(
                store,
                chain,
                existing,
                &vault,
                tx,
                withdrawn_amount,
                shares_burnt,
            );
        }
        None => {
            // Known historical gap: some accounts deposited before their
            // vault was registered, so no position exists to debit.
            if withdrawn_amount.is_zero() {
                warn!(
                    position = %position_id, vault = %vault.id, tx = %tx.id, from = %from,
                    "zero-amount withdrawal without a position"
                );
                position::withdraw_zero(store, &account, &vault, tx);
            } else {
                warn!(
                    position = %position_id, vault = %vault.id, tx = %tx.id, from = %from,
                    amount = %withdrawn_amount,
                    "withdrawal without a position, processing without position debit"
                );
            }
        }
    }

    if vault.latest_update.is_some() {
        let balance = balance_position(store, chain, vault_address);
        vault_update::withdraw(
            store,
            chain,
            prices,
            &vault,
            tx,
            withdrawn_amount,
            shares_burnt,
            balance,
        );
    } else {
        warn!(vault = %vault.id, "withdraw() against a vault with no update history");
    }
}

/// Non-mint/burn share transfer: converts shares to the underlying
/// equivalent, classifies fees, and moves both positions. Vault totals are
/// untouched (a transfer is not a deposit or withdrawal).
#[allow(clippy::too_many_arguments)]
pub fn share_transfer(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    from: &Address,
    to: &Address,
    share_amount: &Amount,
    tx: &Transaction,
) {
    let from_account = transaction::get_or_create_account(store, from);
    let to_account = transaction::get_or_create_account(store, to);
    let vault = get_or_create_vault(store, chain, vault_address, tx);

    let transfer_id =
        crate::entities::Transfer::build_id(&from_account.id, &to_account.id, &tx.id);
    if store.transfers.contains_key(&transfer_id) {
        debug!(id = %transfer_id, "transfer already processed, skipping");
        return;
    }

    let total_assets = amount_or_zero(chain.total_assets(vault_address));
    let total_supply = amount_or_zero(chain.total_supply(vault_address));
    // amount = (shares * totalAssets) / totalSupply
    let token_amount = share_amount.mul_div(&total_assets, &total_supply);

    let token_address = Address::parse(&vault.token).unwrap_or_else(|_| Address::zero());
    let token = transaction::get_or_create_token(store, chain, &token_address);

    transfer::get_or_create_transfer(
        store,
        chain,
        prices,
        &from_account,
        &to_account,
        &vault,
        &token,
        &token_amount,
        share_amount,
        tx,
    );

    position::transfer(
        store,
        chain,
        &from_account,
        &to_account,
        &vault,
        tx,
        &token_amount,
        share_amount,
    );
}

/// Apply a normalized strategy report to the vault: gross returns net of
/// recognized fees, written into the update chain.
pub fn strategy_reported(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    tx: &Transaction,
    report: &StrategyReport,
) {
    info!(vault = %vault_address, tx = %tx.id, "strategy reported");
    let vault = get_or_create_vault(store, chain, vault_address, tx);
    if vault.latest_update.is_none() {
        warn!(
            vault = %vault.id, tx = %tx.id,
            "strategy reporting with no previous vault updates"
        );
    }
    let balance = balance_position(store, chain, vault_address);
    let gross_returns = &report.gain - &report.loss;
    vault_update::strategy_reported(store, chain, prices, &vault, tx, balance, &gross_returns);
}

pub fn performance_fee_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    tx: &Transaction,
    performance_fee: &Amount,
) {
    let Some(vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, fee = %performance_fee, "performance fee update for unknown vault");
        return;
    };
    info!(vault = %vault.id, fee = %performance_fee, "vault performance fee updated");
    let balance = balance_position(store, chain, vault_address);
    vault_update::performance_fee_updated(store, chain, prices, &vault, tx, balance, performance_fee);
    if let Some(mut vault) = store.vaults.get(&vault.id).cloned() {
        vault.performance_fee_bps = performance_fee.to_u64().unwrap_or(0) as u32;
        store.vaults.insert(vault.id.clone(), vault);
    }
}

pub fn management_fee_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    tx: &Transaction,
    management_fee: &Amount,
) {
    let Some(vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, fee = %management_fee, "management fee update for unknown vault");
        return;
    };
    info!(vault = %vault.id, fee = %management_fee, "vault management fee updated");
    let balance = balance_position(store, chain, vault_address);
    vault_update::management_fee_updated(store, chain, prices, &vault, tx, balance, management_fee);
    if let Some(mut vault) = store.vaults.get(&vault.id).cloned() {
        vault.management_fee_bps = management_fee.to_u64().unwrap_or(0) as u32;
        store.vaults.insert(vault.id.clone(), vault);
    }
}

pub fn rewards_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    tx: &Transaction,
    rewards: &Address,
) {
    let Some(vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, rewards = %rewards, "rewards update for unknown vault");
        return;
    };
    info!(vault = %vault.id, rewards = %rewards, "vault rewards address updated");
    let balance = balance_position(store, chain, vault_address);
    vault_update::rewards_updated(store, chain, prices, &vault, tx, balance, rewards);
    if let Some(mut vault) = store.vaults.get(&vault.id).cloned() {
        vault.rewards = rewards.clone();
        store.vaults.insert(vault.id.clone(), vault);
    }
}

pub fn health_check_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    vault_address: &Address,
    health_check: &Address,
    tx: &Transaction,
) {
    let Some(vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(
            vault = %vault_address, health_check = %health_check, tx = %tx.id,
            "health check update for unknown vault"
        );
        return;
    };
    let new_value = if health_check.is_zero() {
        None
    } else {
        Some(health_check.clone())
    };
    vault_update::health_check_updated(store, chain, prices, &vault, tx, new_value.clone());
    if let Some(mut vault) = store.vaults.get(&vault.id).cloned() {
        vault.health_check = new_value;
        store.vaults.insert(vault.id.clone(), vault);
    }
}

// Guardian/management/governance changes are out-of-band metadata: the
// field moves, no VaultUpdate row is written.

pub fn guardian_updated(store: &mut EntityStore, vault_address: &Address, guardian: &Address, tx: &Transaction) {
    let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, tx = %tx.id, "guardian update for unknown vault");
        return;
    };
    info!(vault = %vault.id, guardian = %guardian, "vault guardian updated");
    vault.guardian = guardian.clone();
    store.vaults.insert(vault.id.clone(), vault);
}

pub fn management_updated(store: &mut EntityStore, vault_address: &Address, management: &Address, tx: &Transaction) {
    let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, tx = %tx.id, "management update for unknown vault");
        return;
    };
    info!(vault = %vault.id, management = %management, "vault management updated");
    vault.management = management.clone();
    store.vaults.insert(vault.id.clone(), vault);
}

pub fn governance_updated(store: &mut EntityStore, vault_address: &Address, governance: &Address, tx: &Transaction) {
    let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, tx = %tx.id, "governance update for unknown vault");
        return;
    };
    info!(vault = %vault.id, governance = %governance, "vault governance updated");
    vault.governance = governance.clone();
    store.vaults.insert(vault.id.clone(), vault);
}

pub fn deposit_limit_updated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    vault_address: &Address,
    deposit_limit: &Amount,
    tx: &Transaction,
) {
    let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, tx = %tx.id, "deposit limit update for unknown vault");
        return;
    };
    info!(vault = %vault.id, limit = %deposit_limit, "vault deposit limit updated");
    vault.deposit_limit = deposit_limit.clone();
    vault.available_deposit_limit = match chain.available_deposit_limit(vault_address) {
        Ok(available) => available,
        Err(_) => {
            if vault.deposit_limit <= vault.balance_tokens {
                Amount::zero()
            } else {
                &vault.deposit_limit - &vault.balance_tokens
            }
        }
    };
    store.vaults.insert(vault.id.clone(), vault);
}

pub fn strategy_added_to_queue(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    tx: &Transaction,
) {
    let strategy_id = strategy_address.to_string();
    info!(strategy = %strategy_id, tx = %tx.id, "strategy added to queue");
    let Some(mut strategy) = store.strategies.get(&strategy_id).cloned() else {
        return;
    };
    strategy.in_queue = true;
    store.strategies.insert(strategy_id.clone(), strategy);

    if let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() {
        if !vault.withdrawal_queue.contains(&strategy_id) {
            vault.withdrawal_queue.push(strategy_id);
        }
        store.vaults.insert(vault.id.clone(), vault);
    }
}

pub fn strategy_removed_from_queue(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    tx: &Transaction,
) {
    let strategy_id = strategy_address.to_string();
    info!(strategy = %strategy_id, tx = %tx.id, "strategy removed from queue");
    let Some(mut strategy) = store.strategies.get(&strategy_id).cloned() else {
        return;
    };
    strategy.in_queue = false;
    store.strategies.insert(strategy_id.clone(), strategy);

    if let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() {
        vault.withdrawal_queue.retain(|id| id != &strategy_id);
        store.vaults.insert(vault.id.clone(), vault);
    }
}

/// Wholesale queue replacement: clear `in_queue` on every member of the
/// old queue before setting it on the new one, so a strategy present in
/// both ends up flagged and is never transiently dropped.
pub fn replace_withdrawal_queue(
    store: &mut EntityStore,
    vault_address: &Address,
    new_queue: &[Address],
    tx: &Transaction,
) {
    let Some(mut vault) = store.vaults.get(&Vault::build_id(vault_address)).cloned() else {
        warn!(vault = %vault_address, tx = %tx.id, "queue replacement for unknown vault");
        return;
    };

    for strategy_id in &vault.withdrawal_queue {
        if let Some(mut strategy) = store.strategies.get(strategy_id).cloned() {
            strategy.in_queue = false;
            store.strategies.insert(strategy_id.clone(), strategy);
        }
    }

    let mut queue = Vec::with_capacity(new_queue.len());
    for strategy_address in new_queue {
        let strategy_id = strategy_address.to_string();
        if let Some(mut strategy) = store.strategies.get(&strategy_id).cloned() {
            strategy.in_queue = true;
            store.strategies.insert(strategy_id.clone(), strategy);
        }
        queue.push(strategy_id);
    }
    vault.withdrawal_queue = queue;
    store.vaults.insert(vault.id.clone(), vault);
}
