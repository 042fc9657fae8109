//! Per-UTC-day vault rollups.

use tracing::{debug, warn};

use crate::chain::ChainState;
use crate::domain::{Address, Amount};
use crate::entities::{Vault, VaultDayData, VaultUpdate};
use crate::pricing::{token_decimals, UsdPriceResolver};
use crate::store::EntityStore;

/// Multiple days can pass between updates; the cumulative total is found
/// by searching backward at most this many days.
const MAX_SEARCH_DEPTH: i64 = 100;

/// Fold one vault update into the vault's bucket for the update's UTC day.
pub fn update_vault_day_data(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    prices: &UsdPriceResolver,
    update: &VaultUpdate,
) {
    let Some(vault) = store.vaults.get(&update.vault).cloned() else {
        warn!(vault = %update.vault, "day rollup against unknown vault");
        return;
    };

    let day_index = update.timestamp.day_index();
    let id = VaultDayData::build_id(&vault.id, day_index);
    let mut day = match store.vault_day_data.get(&id) {
        Some(existing) => existing.clone(),
        None => {
            debug!(id = %id, "no day bucket found, creating");
            VaultDayData {
                id: id.clone(),
                vault: vault.id.clone(),
                timestamp: update.timestamp.day_start(),
                day_index,
                price_per_share: update.price_per_share.clone(),
                deposited: Amount::zero(),
                withdrawn: Amount::zero(),
                day_returns_generated: Amount::zero(),
                total_returns_generated: Amount::zero(),
                day_returns_generated_usd: Amount::zero(),
                total_returns_generated_usd: Amount::zero(),
                token_price_usd: Amount::zero(),
            }
        }
    };

    // Always re-resolve the token price so USD fields reflect the price at
    // the time of this event, not a stale cached value.
    let token_address = match Address::parse(&vault.token) {
        Ok(addr) => addr,
        Err(err) => {
            warn!(vault = %vault.id, %err, "vault has unparseable token id");
            return;
        }
    };
    let usd_price = prices.price_per_token(&token_address);
    let price_divisor = Amount::pow10(token_decimals(store, chain, &token_address));

    day.token_price_usd = usd_price.clone();
    day.price_per_share = update.price_per_share.clone();
    day.deposited = &day.deposited + &update.tokens_deposited;
    day.withdrawn = &day.withdrawn + &update.tokens_withdrawn;
    day.day_returns_generated = &day.day_returns_generated + &update.returns_generated;
    day.day_returns_generated_usd = day
        .day_returns_generated
        .mul_div(&usd_price, &price_divisor);

    apply_cumulative_totals(store, &vault, &mut day, &usd_price, &price_divisor);

    store.vault_day_data.insert(id, day);
}

/// Walk backward day-by-day to the most recent prior bucket and extend its
/// cumulative totals; when no bucket exists within the search bound the
/// totals reset as if this were the vault's first recorded day.
fn apply_cumulative_totals(
    store: &EntityStore,
    vault: &Vault,
    day: &mut VaultDayData,
    usd_price: &Amount,
    price_divisor: &Amount,
) {
    for days_in_past in 1..=MAX_SEARCH_DEPTH {
        let prior_id = VaultDayData::build_id(&vault.id, day.day_index - days_in_past);
        if let Some(prior) = store.vault_day_data.get(&prior_id) {
            day.total_returns_generated =
                &prior.total_returns_generated + &day.day_returns_generated;
            day.total_returns_generated_usd = &prior.total_returns_generated_usd
                + &day.day_returns_generated.mul_div(usd_price, price_divisor);
            return;
        }
    }
    warn!(
        vault = %vault.id, day_index = day.day_index,
        "no prior day bucket within search bound, cumulative totals reset"
    );
    day.total_returns_generated = day.day_returns_generated.clone();
    day.total_returns_generated_usd =
        day.day_returns_generated.mul_div(usd_price, price_divisor);
}
