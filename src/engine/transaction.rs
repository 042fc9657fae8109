//! Transaction, account and token resolution.

use tracing::debug;

use crate::chain::ChainState;
use crate::domain::{Address, RecordContext};
use crate::entities::{Account, Token, Transaction};
use crate::store::EntityStore;

/// Resolve the canonical transaction for a record, creating it if absent.
///
/// Idempotent under at-least-once delivery: a second call with the same
/// `(txHash, logIndex)` returns the existing record without re-writing
/// fields. The cause label is diagnostics only.
pub fn get_or_create_transaction(
    store: &mut EntityStore,
    ctx: &RecordContext,
    cause: &str,
) -> Transaction {
    let id = Transaction::build_id(&ctx.tx_hash, ctx.log_index);
    if let Some(existing) = store.transactions.get(&id) {
        debug!(id = %id, cause, "reusing transaction");
        return existing.clone();
    }
    let transaction = Transaction {
        id: id.clone(),
        tx_hash: ctx.tx_hash.clone(),
        log_index: ctx.log_index,
        tx_index: ctx.tx_index,
        from: ctx.tx_from.clone(),
        to: ctx.tx_to.clone(),
        value: ctx.value.clone(),
        gas_price: ctx.gas_price.clone(),
        gas_limit: ctx.gas_limit.clone(),
        block_number: ctx.block_number,
        timestamp: ctx.time_ms(),
        cause: cause.to_string(),
    };
    store.transactions.insert(id, transaction.clone());
    transaction
}

/// Accounts are created lazily on first reference.
pub fn get_or_create_account(store: &mut EntityStore, address: &Address) -> Account {
    let id = Account::build_id(address);
    if let Some(existing) = store.accounts.get(&id) {
        return existing.clone();
    }
    let account = Account::new(address.clone());
    store.accounts.insert(id, account.clone());
    account
}

/// Tokens are created lazily with revert-tolerant metadata reads.
pub fn get_or_create_token(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    address: &Address,
) -> Token {
    let id = Token::build_id(address);
    if let Some(existing) = store.tokens.get(&id) {
        return existing.clone();
    }
    let token = Token {
        id: id.clone(),
        address: address.clone(),
        decimals: chain.token_decimals(address).unwrap_or(18),
        symbol: chain.token_symbol(address).unwrap_or_default(),
        name: chain.token_name(address).unwrap_or_default(),
    };
    store.tokens.insert(id, token.clone());
    token
}
