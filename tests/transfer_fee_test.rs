mod common;

use std::sync::Arc;

use common::*;
use vaultgraph::chain::{ContractFixture, FixtureChainState};
use vaultgraph::domain::Amount;
use vaultgraph::engine::Projector;
use vaultgraph::pricing::UsdPriceResolver;

const VAULT: u8 = 1;
const TOKEN: u8 = 0x20;
const REWARDS: u8 = 0x30;
const STRATEGY: u8 = 0x40;
const USER: u8 = 0x55;

/// Vault at a 1:1 share price so share amounts equal underlying amounts.
fn setup() -> Projector {
    let chain = Arc::new(FixtureChainState::new());
    chain.set(
        &addr(VAULT),
        ContractFixture {
            api_version: Some("0.4.3".to_string()),
            token: Some(addr(TOKEN)),
            rewards: Some(addr(REWARDS)),
            total_assets: Some(amt("100000000")),
            total_supply: Some(amt("100000000")),
            ..Default::default()
        },
    );
    let mut projector = Projector::new(chain, UsdPriceResolver::disabled());
    projector.apply(&deposit_event(
        &addr(VAULT),
        &addr(USER),
        "50000000",
        "50000000",
        1,
        1_640_995_200,
    ));
    projector.apply(&add_strategy_v2(&addr(VAULT), &addr(STRATEGY), 2, 1_640_995_300));
    projector
}

#[test]
fn test_strategy_report_fee_split() {
    let mut projector = setup();

    // strategist fee, then treasury fee, then the report recognizing both
    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(STRATEGY),
        "3304563",
        3,
        1_640_995_400,
    ));
    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(REWARDS),
        "16570558",
        4,
        1_640_995_500,
    ));

    let fee = projector
        .store()
        .token_fees
        .get(addr(VAULT).as_str())
        .expect("fee ledger created");
    assert_eq!(fee.unrecognized_strategy_fees, amt("3304563"));
    assert_eq!(fee.unrecognized_treasury_fees, amt("16570558"));
    assert_eq!(fee.total_fees, Amount::zero());

    projector.apply(&strategy_reported_v2(
        &addr(VAULT),
        &addr(STRATEGY),
        "33043378",
        "0",
        5,
        1_640_995_600,
    ));

    let store = projector.store();
    let fee = store.token_fees.get(addr(VAULT).as_str()).unwrap();
    assert_eq!(fee.unrecognized_strategy_fees, Amount::zero());
    assert_eq!(fee.unrecognized_treasury_fees, Amount::zero());
    assert_eq!(fee.total_strategy_fees, amt("3304563"));
    assert_eq!(fee.total_treasury_fees, amt("16570558"));
    assert_eq!(fee.total_fees, amt("19875121"));

    let latest_update_id = store
        .vaults
        .get(addr(VAULT).as_str())
        .unwrap()
        .latest_update
        .clone()
        .unwrap();
    let update = store.vault_updates.get(&latest_update_id).unwrap();
    // net returns = gross - (strategist fee + treasury fee)
    assert_eq!(update.returns_generated, amt("13168257"));
    assert_eq!(update.total_fees, amt("19875121"));
}

#[test]
fn test_transfer_classification_flags() {
    let mut projector = setup();

    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(STRATEGY),
        "100",
        3,
        1_640_995_400,
    ));
    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(REWARDS),
        "200",
        4,
        1_640_995_500,
    ));
    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(0x77),
        "300",
        5,
        1_640_995_600,
    ));

    let store = projector.store();
    let tx3 = format!("{}-{}-{}-1", addr(USER), addr(STRATEGY), tx_hash(3));
    let tx4 = format!("{}-{}-{}-1", addr(USER), addr(REWARDS), tx_hash(4));
    let tx5 = format!("{}-{}-{}-1", addr(USER), addr(0x77), tx_hash(5));

    let strategist = store.transfers.get(&tx3).expect("strategist transfer");
    assert!(strategist.is_fee_to_strategy);
    assert!(!strategist.is_fee_to_treasury);

    let treasury = store.transfers.get(&tx4).expect("treasury transfer");
    assert!(treasury.is_fee_to_treasury);
    assert!(!treasury.is_fee_to_strategy);

    let plain = store.transfers.get(&tx5).expect("plain transfer");
    assert!(!plain.is_fee_to_strategy);
    assert!(!plain.is_fee_to_treasury);
}

#[test]
fn test_transfer_moves_positions_but_not_vault_totals() {
    let mut projector = setup();

    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(0x77),
        "1000000",
        3,
        1_640_995_400,
    ));

    let store = projector.store();
    let vault = store.vaults.get(addr(VAULT).as_str()).unwrap();
    assert_eq!(vault.shares_supply, amt("50000000"));
    assert_eq!(vault.balance_tokens_idle, amt("50000000"));

    let sender = store
        .positions
        .get(&format!("{}-{}", addr(USER), addr(VAULT)))
        .unwrap();
    assert_eq!(sender.balance_shares, amt("49000000"));

    let recipient = store
        .positions
        .get(&format!("{}-{}", addr(0x77), addr(VAULT)))
        .expect("recipient position created");
    assert_eq!(recipient.balance_shares, amt("1000000"));
}

#[test]
fn test_transfer_on_unknown_contract_is_ignored() {
    let mut projector = setup();

    // addr(9) has never been seen as a vault
    projector.apply(&transfer_event(
        &addr(9),
        &addr(USER),
        &addr(0x77),
        "1000",
        3,
        1_640_995_400,
    ));

    assert!(projector.store().transfers.is_empty());
    assert!(!projector.store().vaults.contains_key(addr(9).as_str()));
}

#[test]
fn test_mint_and_burn_transfers_are_ignored(){
    let mut projector = setup();

    projector.apply(&transfer_event(
        &addr(VAULT),
        &vaultgraph::domain::Address::zero(),
        &addr(USER),
        "1000",
        3,
        1_640_995_400,
    ));
    projector.apply(&transfer_event(
        &addr(VAULT),
        &addr(USER),
        &vaultgraph::domain::Address::zero(),
        "1000",
        4,
        1_640_995_500,
    ));

    assert!(projector.store().transfers.is_empty());
}

#[test]
fn test_redelivered_fee_transfer_does_not_reaccrue() {
    let mut projector = setup();
    let event = transfer_event(
        &addr(VAULT),
        &addr(USER),
        &addr(STRATEGY),
        "3304563",
        3,
        1_640_995_400,
    );

    projector.apply(&event);
    projector.apply(&event);

    let fee = projector
        .store()
        .token_fees
        .get(addr(VAULT).as_str())
        .unwrap();
    assert_eq!(fee.unrecognized_strategy_fees, amt("3304563"));
}
