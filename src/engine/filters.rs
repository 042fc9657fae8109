//! Legacy call gating.
//!
//! From API version 0.4.4 the vault emits Deposit/Withdraw events covering
//! the same state change as the legacy call handlers; processing both
//! would double-count balances. Calls routed through a minimal proxy also
//! surface twice (outer and inner call) and are de-duplicated here.

use tracing::{error, info, warn};

use crate::chain::ChainState;
use crate::domain::{Address, ApiVersion, TxHash};
use crate::store::EntityStore;

/// Last API version whose deposits/withdrawals are call-only.
const LAST_VERSION_WITHOUT_EVENTS: ApiVersion = ApiVersion::new(0, 4, 3);

/// Whether a vault at `api_version` emits deposit events.
pub fn deposit_events_supported(api_version: &str) -> bool {
    version_exceeds(api_version, &LAST_VERSION_WITHOUT_EVENTS)
}

/// Whether a vault at `api_version` emits withdraw events.
pub fn withdraw_events_supported(api_version: &str) -> bool {
    version_exceeds(api_version, &LAST_VERSION_WITHOUT_EVENTS)
}

/// Componentwise comparison with an explicit malformed-input rule: a
/// version string that does not parse keeps the legacy handlers active
/// (gate stays closed) and is logged as an error.
fn version_exceeds(candidate: &str, threshold: &ApiVersion) -> bool {
    match candidate.parse::<ApiVersion>() {
        Ok(version) => version.is_greater_than(threshold),
        Err(err) => {
            error!(%err, "unsupported version string, retaining legacy call handling");
            false
        }
    }
}

/// True when the current deposit call must be skipped: proxy double-call
/// (caller and callee are both known vaults), unreadable `apiVersion()`,
/// or a version whose events already cover the change.
pub fn should_skip_deposit_call(
    store: &EntityStore,
    chain: &dyn ChainState,
    call_to: &Address,
    call_from: &Address,
    tx_hash: &TxHash,
) -> bool {
    if store.is_vault(call_to) && store.is_vault(call_from) {
        warn!(
            tx = %tx_hash, to = %call_to, from = %call_from,
            "deposit call between two vaults (minimal proxy), not processing"
        );
        return true;
    }
    let Ok(api_version) = chain.api_version(call_to) else {
        info!(
            vault = %call_to,
            "deposit call handler triggered but contract has no apiVersion(), skipping"
        );
        return true;
    };
    if deposit_events_supported(&api_version) {
        info!(vault = %call_to, "vault supports event-based deposits, skipping call handler");
        return true;
    }
    false
}

/// Withdraw-side counterpart of [`should_skip_deposit_call`].
pub fn should_skip_withdraw_call(
    store: &EntityStore,
    chain: &dyn ChainState,
    call_to: &Address,
    call_from: &Address,
    tx_hash: &TxHash,
) -> bool {
    if store.is_vault(call_to) && store.is_vault(call_from) {
        warn!(
            tx = %tx_hash, to = %call_to, from = %call_from,
            "withdraw call between two vaults (minimal proxy), not processing"
        );
        return true;
    }
    let Ok(api_version) = chain.api_version(call_to) else {
        info!(
            vault = %call_to,
            "withdraw call handler triggered but contract has no apiVersion(), skipping"
        );
        return true;
    };
    if withdraw_events_supported(&api_version) {
        info!(vault = %call_to, "vault supports event-based withdrawals, skipping call handler");
        return true;
    }
    false
}
