//! The ingestor.
//!
//! Pulls one batch of decoded records, sorts them into strict
//! `(block, txIndex, logIndex)` order, folds them through the projector,
//! and persists the resulting entity set.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::datasource::{DataSourceError, RecordSource};
use crate::db::Repository;
use crate::domain::sort_records_deterministic;
use crate::engine::Projector;

pub struct Ingestor {
    source: Arc<dyn RecordSource>,
    repo: Arc<Repository>,
}

#[derive(Debug)]
pub struct IngestionReport {
    pub records_processed: usize,
    pub entities_persisted: usize,
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl Ingestor {
    pub fn new(source: Arc<dyn RecordSource>, repo: Arc<Repository>) -> Self {
        Ingestor { source, repo }
    }

    /// Run one ingestion pass through the given projector.
    pub async fn run(&self, projector: &mut Projector) -> Result<IngestionReport, IngestionError> {
        let mut records = self.source.fetch_records().await?;
        sort_records_deterministic(&mut records);

        for record in &records {
            projector.apply(record);
        }

        let entities_persisted = self.repo.persist_store(projector.store()).await?;
        info!(
            records = records.len(),
            entities = entities_persisted,
            "ingestion pass complete"
        );
        Ok(IngestionReport {
            records_processed: records.len(),
            entities_persisted,
        })
    }
}
