mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use tempfile::TempDir;
use tower::ServiceExt;
use vaultgraph::api::{create_router, AppState};
use vaultgraph::chain::{ContractFixture, FixtureChainState};
use vaultgraph::datasource::MockRecordSource;
use vaultgraph::db::init_db;
use vaultgraph::engine::Projector;
use vaultgraph::orchestration::Ingestor;
use vaultgraph::pricing::UsdPriceResolver;
use vaultgraph::Repository;

async fn app_with_data() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let chain = Arc::new(FixtureChainState::new());
    chain.set(
        &addr(1),
        ContractFixture {
            api_version: Some("0.4.3".to_string()),
            token: Some(addr(0x20)),
            ..Default::default()
        },
    );
    let source = Arc::new(MockRecordSource::new(vec![deposit_event(
        &addr(1),
        &addr(0x55),
        "1000",
        "1000",
        1,
        1_640_995_200,
    )]));
    let ingestor = Ingestor::new(source, repo.clone());
    let mut projector = Projector::new(chain, UsdPriceResolver::disabled());
    ingestor.run(&mut projector).await.expect("ingestion failed");

    (create_router(AppState { repo }), temp_dir)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = app_with_data().await;
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_vault_listing_and_detail() {
    let (app, _dir) = app_with_data().await;

    let (status, body) = get_json(&app, "/vaults").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vaults"].as_array().unwrap().len(), 1);
    assert_eq!(body["vaults"][0]["shares_supply"], "1000");

    let uri = format!("/vaults/{}", addr(1));
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["id"], addr(1).to_string());

    // Checksummed/upper-case addresses normalize to the same row.
    let mixed = addr(1).to_string().to_uppercase();
    let (status, _) = get_json(&app, &format!("/vaults/{}", mixed)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vault_not_found_and_bad_address() {
    let (app, _dir) = app_with_data().await;

    let (status, _) = get_json(&app, &format!("/vaults/{}", addr(9))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, "/vaults/not-an-address").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_updates_day_data_and_positions() {
    let (app, _dir) = app_with_data().await;

    let (status, body) = get_json(&app, &format!("/vaults/{}/updates?limit=5", addr(1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updates"].as_array().unwrap().len(), 1);
    assert_eq!(body["updates"][0]["tokens_deposited"], "1000");

    let (status, body) = get_json(&app, &format!("/vaults/{}/day-data", addr(1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day_data"][0]["deposited"], "1000");

    let (status, body) = get_json(&app, &format!("/accounts/{}/positions", addr(0x55))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["positions"][0]["balance_shares"], "1000");
}
