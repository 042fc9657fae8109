//! In-memory record source for tests.

use async_trait::async_trait;

use crate::datasource::{DataSourceError, RecordSource};
use crate::domain::ChainRecord;

#[derive(Debug, Default)]
pub struct MockRecordSource {
    records: Vec<ChainRecord>,
}

impl MockRecordSource {
    pub fn new(records: Vec<ChainRecord>) -> Self {
        MockRecordSource { records }
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_records(&self) -> Result<Vec<ChainRecord>, DataSourceError> {
        Ok(self.records.clone())
    }
}
