mod common;

use std::sync::Arc;

use common::*;
use tempfile::TempDir;
use vaultgraph::chain::{ContractFixture, FixtureChainState};
use vaultgraph::datasource::MockRecordSource;
use vaultgraph::db::init_db;
use vaultgraph::engine::Projector;
use vaultgraph::orchestration::Ingestor;
use vaultgraph::pricing::UsdPriceResolver;
use vaultgraph::Repository;

fn fixture_chain() -> Arc<FixtureChainState> {
    let chain = Arc::new(FixtureChainState::new());
    chain.set(
        &addr(1),
        ContractFixture {
            api_version: Some("0.4.3".to_string()),
            token: Some(addr(0x20)),
            rewards: Some(addr(0x30)),
            ..Default::default()
        },
    );
    chain
}

async fn setup_repo() -> (Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    (Arc::new(Repository::new(pool)), temp_dir)
}

#[tokio::test]
async fn test_ingest_sorts_folds_and_persists() {
    let (repo, _dir) = setup_repo().await;

    // Delivered out of order: the withdrawal's block precedes the second
    // deposit in delivery order but not in chain order.
    let records = vec![
        withdraw_event(&addr(1), &addr(0x55), "300", "300", 3, 1_640_995_400),
        deposit_event(&addr(1), &addr(0x55), "1000", "1000", 1, 1_640_995_200),
        deposit_event(&addr(1), &addr(0x55), "500", "500", 2, 1_640_995_300),
    ];
    let source = Arc::new(MockRecordSource::new(records));
    let ingestor = Ingestor::new(source, repo.clone());
    let mut projector = Projector::new(fixture_chain(), UsdPriceResolver::disabled());

    let report = ingestor.run(&mut projector).await.expect("ingestion failed");
    assert_eq!(report.records_processed, 3);
    assert!(report.entities_persisted > 0);

    let vaults = repo.list_vaults().await.unwrap();
    assert_eq!(vaults.len(), 1);
    assert_eq!(vaults[0].shares_supply, "1200");
    assert_eq!(vaults[0].balance_tokens_idle, "1200");

    let vault = repo
        .get_vault(addr(1).as_str())
        .await
        .unwrap()
        .expect("vault row");
    assert_eq!(vault.classification, "Experimental");
    assert!(vault.latest_update.is_some());

    let updates = repo.list_vault_updates(addr(1).as_str(), 10).await.unwrap();
    assert_eq!(updates.len(), 3);
    // Newest first: the withdrawal.
    assert_eq!(updates[0].tokens_withdrawn, "300");

    let positions = repo
        .list_positions_for_account(addr(0x55).as_str())
        .await
        .unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].balance_shares, "1200");

    let day_data = repo.list_vault_day_data(addr(1).as_str()).await.unwrap();
    assert_eq!(day_data.len(), 1);
    assert_eq!(day_data[0].deposited, "1500");
    assert_eq!(day_data[0].withdrawn, "300");
}

#[tokio::test]
async fn test_reprocessing_converges_on_identical_rows() {
    let (repo, _dir) = setup_repo().await;
    let records = vec![
        deposit_event(&addr(1), &addr(0x55), "1000", "1000", 1, 1_640_995_200),
        withdraw_event(&addr(1), &addr(0x55), "400", "400", 2, 1_640_995_300),
    ];

    for _ in 0..2 {
        let source = Arc::new(MockRecordSource::new(records.clone()));
        let ingestor = Ingestor::new(source, repo.clone());
        let mut projector = Projector::new(fixture_chain(), UsdPriceResolver::disabled());
        ingestor.run(&mut projector).await.expect("ingestion failed");
    }

    let vaults = repo.list_vaults().await.unwrap();
    assert_eq!(vaults.len(), 1);
    assert_eq!(vaults[0].shares_supply, "600");

    let updates = repo.list_vault_updates(addr(1).as_str(), 10).await.unwrap();
    assert_eq!(updates.len(), 2);

    let positions = repo
        .list_positions_for_account(addr(0x55).as_str())
        .await
        .unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].balance_shares, "600");
}
