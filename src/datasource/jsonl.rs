//! JSONL file record source.
//!
//! One decoded record per line. A malformed line is logged and skipped
//! rather than failing the batch; the stream cannot be selectively
//! retried, so continuation beats halting.

use async_trait::async_trait;
use tracing::{error, info};

use crate::datasource::{DataSourceError, RecordSource};
use crate::domain::ChainRecord;

#[derive(Debug, Clone)]
pub struct JsonlRecordSource {
    path: String,
}

impl JsonlRecordSource {
    pub fn new(path: impl Into<String>) -> Self {
        JsonlRecordSource { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for JsonlRecordSource {
    async fn fetch_records(&self) -> Result<Vec<ChainRecord>, DataSourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ChainRecord>(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    skipped += 1;
                    error!(
                        path = %self.path, line = line_number + 1, %err,
                        "malformed record line, skipping"
                    );
                }
            }
        }
        info!(
            path = %self.path, records = records.len(), skipped,
            "loaded record batch"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_records_and_skips_malformed_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"contract":"0x0000000000000000000000000000000000000001","block_number":1,"timestamp":1640995200,"tx_hash":"0x0000000000000000000000000000000000000000000000000000000000000001","tx_index":0,"log_index":1,"tx_from":"0x0000000000000000000000000000000000000002","payload":{{"kind":"emergency_exit_enabled"}}}}"#
        )
        .unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();

        let source = JsonlRecordSource::new(path.to_string_lossy().to_string());
        let records = source.fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ctx.block_number, 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = JsonlRecordSource::new("/nonexistent/records.jsonl");
        assert!(source.fetch_records().await.is_err());
    }
}
