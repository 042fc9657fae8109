//! Stream orchestration: fetch, order, fold, persist.

pub mod ingest;

pub use ingest::{IngestionError, IngestionReport, Ingestor};
