mod common;

use std::sync::Arc;

use common::*;
use vaultgraph::chain::{ContractFixture, FixtureChainState};
use vaultgraph::domain::Amount;
use vaultgraph::engine::Projector;
use vaultgraph::pricing::UsdPriceResolver;

fn projector_with_vault_fixture(vault_n: u8) -> (Projector, Arc<FixtureChainState>) {
    let chain = Arc::new(FixtureChainState::new());
    chain.set(
        &addr(vault_n),
        ContractFixture {
            api_version: Some("0.4.3".to_string()),
            token: Some(addr(0x20)),
            rewards: Some(addr(0x30)),
            ..Default::default()
        },
    );
    let projector = Projector::new(chain.clone(), UsdPriceResolver::disabled());
    (projector, chain)
}

#[test]
fn test_initial_deposit_bootstraps_one_to_one() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let user = addr(0x55);

    projector.apply(&deposit_event(&vault, &user, "79056085", "79056085", 7, 1_640_995_200));

    let store = projector.store();
    let vault_entity = store.vaults.get(vault.as_str()).expect("vault created");
    assert_eq!(vault_entity.shares_supply, amt("79056085"));
    assert_eq!(vault_entity.balance_tokens_idle, amt("79056085"));

    let position = store
        .positions
        .get(&format!("{}-{}", user, vault))
        .expect("position created");
    assert_eq!(position.balance_shares, amt("79056085"));
    assert_eq!(position.balance_tokens, amt("79056085"));

    // Deposit keyed {account}-{txHash}-{logIndex}-{txIndex}
    let deposit_id = format!("{}-{}-1-0", user, tx_hash(7));
    let deposit = store.deposits.get(&deposit_id).expect("deposit recorded");
    assert_eq!(deposit.token_amount, amt("79056085"));
    assert_eq!(deposit.shares_minted, amt("79056085"));
}

#[test]
fn test_balance_conservation_over_deposit_withdraw_sequence() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let user = addr(0x55);

    projector.apply(&deposit_event(&vault, &user, "1000", "1000", 1, 1_640_995_200));
    projector.apply(&deposit_event(&vault, &user, "500", "450", 2, 1_640_995_300));
    projector.apply(&withdraw_event(&vault, &user, "300", "280", 3, 1_640_995_400));

    let vault_entity = projector.store().vaults.get(vault.as_str()).unwrap();
    // sharesSupply == sum(minted) - sum(burnt)
    assert_eq!(vault_entity.shares_supply, amt("1170"));
    // balanceTokensIdle == sum(deposited) - sum(withdrawn)
    assert_eq!(vault_entity.balance_tokens_idle, amt("1200"));

    let position = projector
        .store()
        .positions
        .get(&format!("{}-{}", user, vault))
        .unwrap();
    assert_eq!(position.balance_shares, amt("1170"));
    assert_eq!(position.balance_tokens, amt("1200"));
}

#[test]
fn test_redelivered_deposit_does_not_double_count() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let user = addr(0x55);
    let event = deposit_event(&vault, &user, "1000", "1000", 1, 1_640_995_200);

    projector.apply(&event);
    projector.apply(&event);

    let store = projector.store();
    assert_eq!(store.deposits.len(), 1);
    assert_eq!(store.transactions.len(), 1);
    let vault_entity = store.vaults.get(vault.as_str()).unwrap();
    assert_eq!(vault_entity.shares_supply, amt("1000"));
    let position = store.positions.get(&format!("{}-{}", user, vault)).unwrap();
    assert_eq!(position.balance_shares, amt("1000"));
}

#[test]
fn test_zero_withdrawal_without_position_creates_empty_position() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let stranger = addr(0x66);

    // Vault must exist with history for the update chain; another account
    // deposits first.
    projector.apply(&deposit_event(&vault, &addr(0x55), "1000", "1000", 1, 1_640_995_200));
    projector.apply(&withdraw_event(&vault, &stranger, "0", "0", 2, 1_640_995_300));

    let store = projector.store();
    let position = store
        .positions
        .get(&format!("{}-{}", stranger, vault))
        .expect("degenerate zero-withdrawal position");
    assert_eq!(position.balance_shares, Amount::zero());
    assert_eq!(position.balance_tokens, Amount::zero());

    let withdrawal_id = format!("{}-{}-1-0", stranger, tx_hash(2));
    assert!(store.withdrawals.contains_key(&withdrawal_id));
}

#[test]
fn test_nonzero_withdrawal_without_position_still_processes() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let stranger = addr(0x66);

    projector.apply(&deposit_event(&vault, &addr(0x55), "1000", "1000", 1, 1_640_995_200));
    projector.apply(&withdraw_event(&vault, &stranger, "200", "200", 2, 1_640_995_300));

    let store = projector.store();
    // No position is invented for the anomaly...
    assert!(!store
        .positions
        .contains_key(&format!("{}-{}", stranger, vault)));
    // ...but the withdrawal record and the vault-level totals still move.
    let withdrawal_id = format!("{}-{}-1-0", stranger, tx_hash(2));
    assert!(store.withdrawals.contains_key(&withdrawal_id));
    let vault_entity = store.vaults.get(vault.as_str()).unwrap();
    assert_eq!(vault_entity.shares_supply, amt("800"));
    assert_eq!(vault_entity.balance_tokens_idle, amt("800"));
}

#[test]
fn test_vault_update_chain_links_backward() {
    let (mut projector, _chain) = projector_with_vault_fixture(1);
    let vault = addr(1);
    let user = addr(0x55);

    projector.apply(&deposit_event(&vault, &user, "1000", "1000", 1, 1_640_995_200));
    let first_update = projector
        .store()
        .vaults
        .get(vault.as_str())
        .unwrap()
        .latest_update
        .clone()
        .expect("latest update set");

    projector.apply(&deposit_event(&vault, &user, "500", "500", 2, 1_640_995_300));
    let second_update = projector
        .store()
        .vaults
        .get(vault.as_str())
        .unwrap()
        .latest_update
        .clone()
        .unwrap();

    assert_ne!(first_update, second_update);
    assert!(projector.store().vault_updates.contains_key(&first_update));
    assert!(projector.store().vault_updates.contains_key(&second_update));
}

#[test]
fn test_available_deposit_limit_clamps_at_zero() {
    let chain = Arc::new(FixtureChainState::new());
    chain.set(
        &addr(1),
        ContractFixture {
            api_version: Some("0.4.3".to_string()),
            token: Some(addr(0x20)),
            deposit_limit: Some(amt("500")),
            ..Default::default()
        },
    );
    let mut projector = Projector::new(chain, UsdPriceResolver::disabled());
    let vault = addr(1);

    projector.apply(&deposit_event(&vault, &addr(0x55), "300", "300", 1, 1_640_995_200));
    let vault_entity = projector.store().vaults.get(vault.as_str()).unwrap();
    assert_eq!(vault_entity.available_deposit_limit, amt("200"));

    projector.apply(&deposit_event(&vault, &addr(0x55), "400", "400", 2, 1_640_995_300));
    let vault_entity = projector.store().vaults.get(vault.as_str()).unwrap();
    assert_eq!(vault_entity.available_deposit_limit, Amount::zero());
}
