pub mod api;
pub mod chain;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod entities;
pub mod error;
pub mod orchestration;
pub mod pricing;
pub mod store;

pub use chain::{ChainState, ContractFixture, FixtureChainState, NullChainState};
pub use config::Config;
pub use datasource::{DataSourceError, JsonlRecordSource, MockRecordSource, RecordSource};
pub use db::{init_db, Repository};
pub use domain::{
    Address, Amount, ApiVersion, ChainRecord, RecordContext, RecordPayload, TimeMs, TxHash,
};
pub use engine::Projector;
pub use error::AppError;
pub use pricing::{Network, UsdPriceResolver};
pub use store::EntityStore;
