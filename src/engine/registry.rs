//! Registry projection: vault releases, endorsements and experiments.

use tracing::{info, warn};

use crate::chain::ChainState;
use crate::domain::Address;
use crate::engine::vault as vault_engine;
use crate::entities::{Registry, Transaction, Vault, VaultClassification};
use crate::store::EntityStore;

/// Registries are created lazily; every event refreshes the
/// last-transaction bookkeeping.
pub fn get_or_create_registry(
    store: &mut EntityStore,
    address: &Address,
    tx: &Transaction,
) -> Registry {
    let id = Registry::build_id(address);
    let mut registry = store.registries.get(&id).cloned().unwrap_or_else(|| Registry {
        id: id.clone(),
        address: address.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        released_vaults: vec![],
        endorsed_vaults: vec![],
        experimental_vaults: vec![],
    });
    registry.transaction = tx.id.clone();
    registry.timestamp = tx.timestamp;
    registry.block_number = tx.block_number;
    store.registries.insert(id, registry.clone());
    registry
}

fn track(list: &mut Vec<String>, vault_id: &str) {
    if !list.iter().any(|id| id == vault_id) {
        list.push(vault_id.to_string());
    }
}

/// NewRelease: the registry published a new vault release template.
pub fn new_release(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    registry_address: &Address,
    template: &Address,
    api_version: &str,
    tx: &Transaction,
) {
    info!(
        registry = %registry_address, vault = %template, api_version,
        "new release"
    );
    let mut registry = get_or_create_registry(store, registry_address, tx);
    let vault = vault_engine::create_registered_vault(
        store,
        chain,
        &registry.id,
        template,
        VaultClassification::Released,
        api_version,
        tx,
    );
    track(&mut registry.released_vaults, &vault.id);
    store.registries.insert(registry.id.clone(), registry);
}

/// NewVault: an endorsed production vault.
pub fn new_vault(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    registry_address: &Address,
    vault_address: &Address,
    api_version: &str,
    tx: &Transaction,
) {
    info!(
        registry = %registry_address, vault = %vault_address, api_version,
        "new endorsed vault"
    );
    let mut registry = get_or_create_registry(store, registry_address, tx);
    let vault = vault_engine::create_registered_vault(
        store,
        chain,
        &registry.id,
        vault_address,
        VaultClassification::Endorsed,
        api_version,
        tx,
    );
    track(&mut registry.endorsed_vaults, &vault.id);
    store.registries.insert(registry.id.clone(), registry);
}

/// NewExperimentalVault: deployed but not endorsed.
pub fn new_experimental_vault(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    registry_address: &Address,
    vault_address: &Address,
    api_version: &str,
    tx: &Transaction,
) {
    info!(
        registry = %registry_address, vault = %vault_address, api_version,
        "new experimental vault"
    );
    let mut registry = get_or_create_registry(store, registry_address, tx);
    let vault = vault_engine::create_registered_vault(
        store,
        chain,
        &registry.id,
        vault_address,
        VaultClassification::Experimental,
        api_version,
        tx,
    );
    track(&mut registry.experimental_vaults, &vault.id);
    store.registries.insert(registry.id.clone(), registry);
}

/// VaultTagged: replaces the vault's tag list.
pub fn vault_tagged(store: &mut EntityStore, vault_address: &Address, tag: &str) {
    let id = Vault::build_id(vault_address);
    info!(vault = %id, tag, "tagging vault");
    let Some(mut vault) = store.vaults.get(&id).cloned() else {
        warn!(vault = %id, "vault does not exist for tagging");
        return;
    };
    vault.tags = tag
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    store.vaults.insert(id, vault);
}
