//! Decoded-record sources.
//!
//! The chain-event subscription and ABI decoding live outside this
//! process; a `RecordSource` hands the projection a batch of
//! already-decoded records.

pub mod jsonl;
pub mod mock;

pub use jsonl::JsonlRecordSource;
pub use mock::MockRecordSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ChainRecord;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("record source io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<ChainRecord>, DataSourceError>;
}
