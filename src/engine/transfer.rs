//! Share transfer records.

use tracing::debug;

use crate::chain::ChainState;
use crate::domain::Amount;
use crate::engine::fees;
use crate::entities::{Account, Token, Transaction, Transfer, Vault};
use crate::pricing::UsdPriceResolver;
use crate::store::EntityStore;

/// Create the transfer record and classify it against the fee ledger.
///
/// The existence check runs before classification: a redelivered transfer
/// must not accrue its fee a second time.
#[allow(clippy::too_many_arguments)]
pub fn get_or_create_transfer(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    from_account: &Account,
    to_account: &Account,
    vault: &Vault,
    token: &Token,
    token_amount: &Amount,
    share_amount: &Amount,
    tx: &Transaction,
) -> Transfer {
    let id = Transfer::build_id(&from_account.id, &to_account.id, &tx.id);
    if let Some(existing) = store.transfers.get(&id) {
        debug!(id = %id, "transfer already recorded, skipping fee accrual");
        return existing.clone();
    }

    let token_amount_usd = prices.resolve(store, chain, &token.address, token_amount);
    let kind = fees::classify_and_accrue(store, vault, &to_account.id, token_amount);

    let transfer = Transfer {
        id: id.clone(),
        from: from_account.id.clone(),
        to: to_account.id.clone(),
        vault: vault.id.clone(),
        token: token.id.clone(),
        token_amount: token_amount.clone(),
        token_amount_usd,
        share_token: vault.share_token.clone(),
        share_amount: share_amount.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        is_fee_to_strategy: kind.is_fee_to_strategy(),
        is_fee_to_treasury: kind.is_fee_to_treasury(),
    };
    store.transfers.insert(id, transfer.clone());
    transfer
}
