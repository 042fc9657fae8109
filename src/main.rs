use std::net::SocketAddr;
use std::sync::Arc;

use vaultgraph::chain::{ChainState, FixtureChainState, NullChainState};
use vaultgraph::datasource::JsonlRecordSource;
use vaultgraph::engine::Projector;
use vaultgraph::orchestration::Ingestor;
use vaultgraph::pricing::{PriceSourceAddresses, UsdPriceResolver};
use vaultgraph::{api, config::Config, db::init_db, Repository};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    let repo = Arc::new(Repository::new(pool));

    // Live RPC pricing sources are an external collaborator; the resolved
    // addresses are logged so operators can see which deployment applies.
    let sources = PriceSourceAddresses::for_network(config.network);
    tracing::info!(
        network = %config.network,
        usd_oracle = %sources.usd_oracle,
        amm_calculator = %sources.amm_calculator,
        "price source configuration resolved"
    );

    let chain: Arc<dyn ChainState> = match &config.chain_state_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => match FixtureChainState::from_json(&json) {
                Ok(fixture) => Arc::new(fixture),
                Err(e) => {
                    eprintln!("Failed to parse chain state fixture {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Failed to read chain state fixture {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Arc::new(NullChainState),
    };

    if let Some(records_path) = &config.records_path {
        let source = Arc::new(JsonlRecordSource::new(records_path.clone()));
        let ingestor = Ingestor::new(source, repo.clone());
        let mut projector = Projector::new(chain, UsdPriceResolver::disabled());
        match ingestor.run(&mut projector).await {
            Ok(report) => tracing::info!(
                records = report.records_processed,
                entities = report.entities_persisted,
                "ingestion finished"
            ),
            Err(e) => {
                eprintln!("Ingestion failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let app = api::create_router(api::AppState { repo });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
