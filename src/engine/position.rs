//! Account vault positions.
//!
//! Positions are the mutable "current holdings" rows; every change also
//! appends an immutable AccountVaultPositionUpdate carrying cumulative
//! counters, chained backward off `latest_update`.

use tracing::warn;

use crate::chain::{amount_or_zero, ChainState};
use crate::domain::Amount;
use crate::entities::{
    Account, AccountVaultPosition, AccountVaultPositionUpdate, Transaction, Vault,
};
use crate::pricing::token_decimals;
use crate::store::EntityStore;

/// Value of `balance_shares` in underlying units at the current price per
/// share; zero when the share price is unavailable.
fn position_value(
    store: &EntityStore,
    chain: &dyn ChainState,
    vault: &Vault,
    balance_shares: &Amount,
) -> Amount {
    let price_per_share = amount_or_zero(chain.price_per_share(&vault.address));
    let decimals = token_decimals(store, chain, &vault.address);
    balance_shares.mul_div(&price_per_share, &Amount::pow10(decimals))
}

/// Cumulative counters carried over from a position's latest update.
#[derive(Default, Clone)]
struct Carried {
    deposits: Amount,
    withdrawals: Amount,
    shares_minted: Amount,
    shares_burnt: Amount,
    shares_sent: Amount,
    shares_received: Amount,
    tokens_sent: Amount,
    tokens_received: Amount,
}

fn carried_counters(store: &EntityStore, position: &AccountVaultPosition) -> Carried {
    let Some(latest_id) = &position.latest_update else {
        return Carried::default();
    };
    match store.position_updates.get(latest_id) {
        Some(update) => Carried {
            deposits: update.deposits.clone(),
            withdrawals: update.withdrawals.clone(),
            shares_minted: update.shares_minted.clone(),
            shares_burnt: update.shares_burnt.clone(),
            shares_sent: update.shares_sent.clone(),
            shares_received: update.shares_received.clone(),
            tokens_sent: update.tokens_sent.clone(),
            tokens_received: update.tokens_received.clone(),
        },
        None => {
            warn!(position = %position.id, update = %latest_id, "latest position update missing");
            Carried::default()
        }
    }
}

fn blank_position(account: &Account, vault: &Vault, tx: &Transaction) -> AccountVaultPosition {
    AccountVaultPosition {
        id: AccountVaultPosition::build_id(&account.id, &vault.id),
        account: account.id.clone(),
        vault: vault.id.clone(),
        token: vault.token.clone(),
        share_token: vault.share_token.clone(),
        transaction: tx.id.clone(),
        balance_shares: Amount::zero(),
        balance_tokens: Amount::zero(),
        balance_profit: Amount::zero(),
        latest_update: None,
        update_count: 0,
    }
}

/// Append an update snapshot and commit the mutated position.
fn commit(
    store: &mut EntityStore,
    mut position: AccountVaultPosition,
    tx: &Transaction,
    carried: Carried,
    balance_position: Amount,
) {
    let order = position.update_count;
    let update_id =
        AccountVaultPositionUpdate::build_id(&position.account, &position.vault, order);
    let update = AccountVaultPositionUpdate {
        id: update_id.clone(),
        order,
        account: position.account.clone(),
        vault: position.vault.clone(),
        position: position.id.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        deposits: carried.deposits,
        withdrawals: carried.withdrawals,
        shares_minted: carried.shares_minted,
        shares_burnt: carried.shares_burnt,
        shares_sent: carried.shares_sent,
        shares_received: carried.shares_received,
        tokens_sent: carried.tokens_sent,
        tokens_received: carried.tokens_received,
        balance_shares: position.balance_shares.clone(),
        balance_position,
    };
    store.position_updates.insert(update_id.clone(), update);
    position.latest_update = Some(update_id);
    position.update_count = order + 1;
    store.positions.insert(position.id.clone(), position);
}

/// Credit a deposit to the account's position, creating it on first use.
pub fn deposit(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    account: &Account,
    vault: &Vault,
    tx: &Transaction,
    deposited: &Amount,
    shares_minted: &Amount,
) {
    let id = AccountVaultPosition::build_id(&account.id, &vault.id);
    let mut position = store
        .positions
        .get(&id)
        .cloned()
        .unwrap_or_else(|| blank_position(account, vault, tx));
    let mut carried = carried_counters(store, &position);

    position.balance_shares = &position.balance_shares + shares_minted;
    position.balance_tokens = &position.balance_tokens + deposited;
    carried.deposits = &carried.deposits + deposited;
    carried.shares_minted = &carried.shares_minted + shares_minted;

    let value = position_value(store, chain, vault, &position.balance_shares);
    commit(store, position, tx, carried, value);
}

/// Debit a withdrawal from an existing position.
pub fn withdraw(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    position: AccountVaultPosition,
    vault: &Vault,
    tx: &Transaction,
    withdrawn: &Amount,
    shares_burnt: &Amount,
) {
    let mut position = position;
    let mut carried = carried_counters(store, &position);

    position.balance_shares = &position.balance_shares - shares_burnt;
    position.balance_tokens = &position.balance_tokens - withdrawn;
    carried.withdrawals = &carried.withdrawals + withdrawn;
    carried.shares_burnt = &carried.shares_burnt + shares_burnt;

    let value = position_value(store, chain, vault, &position.balance_shares);
    commit(store, position, tx, carried, value);
}

/// Degenerate path for a zero-amount withdrawal against a position that was
/// never created (deposits made before the vault was registered). Creates
/// an empty position so the account's history is anchored.
pub fn withdraw_zero(
    store: &mut EntityStore,
    account: &Account,
    vault: &Vault,
    tx: &Transaction,
) {
    let position = blank_position(account, vault, tx);
    commit(store, position, tx, Carried::default(), Amount::zero());
}

/// Move shares between two positions without touching vault totals.
#[allow(clippy::too_many_arguments)]
pub fn transfer(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    from_account: &Account,
    to_account: &Account,
    vault: &Vault,
    tx: &Transaction,
    token_amount: &Amount,
    share_amount: &Amount,
) {
    // Debit the sender.
    let from_id = AccountVaultPosition::build_id(&from_account.id, &vault.id);
    let mut from_position = match store.positions.get(&from_id) {
        Some(p) => p.clone(),
        None => {
            warn!(
                position = %from_id, tx = %tx.id,
                "transfer from account without a position, creating empty sender position"
            );
            blank_position(from_account, vault, tx)
        }
    };
    let mut carried = carried_counters(store, &from_position);
    from_position.balance_shares = &from_position.balance_shares - share_amount;
    from_position.balance_tokens = &from_position.balance_tokens - token_amount;
    carried.shares_sent = &carried.shares_sent + share_amount;
    carried.tokens_sent = &carried.tokens_sent + token_amount;
    let value = position_value(store, chain, vault, &from_position.balance_shares);
    commit(store, from_position, tx, carried, value);

    // Credit the recipient.
    let to_id = AccountVaultPosition::build_id(&to_account.id, &vault.id);
    let mut to_position = store
        .positions
        .get(&to_id)
        .cloned()
        .unwrap_or_else(|| blank_position(to_account, vault, tx));
    let mut carried = carried_counters(store, &to_position);
    to_position.balance_shares = &to_position.balance_shares + share_amount;
    to_position.balance_tokens = &to_position.balance_tokens + token_amount;
    carried.shares_received = &carried.shares_received + share_amount;
    carried.tokens_received = &carried.tokens_received + token_amount;
    let value = position_value(store, chain, vault, &to_position.balance_shares);
    commit(store, to_position, tx, carried, value);
}
