//! Stable record ordering for deterministic processing.

use crate::domain::ChainRecord;

/// Stable ordering key for decoded records.
///
/// Running totals are incrementally derived, so records must fold in strict
/// `(block_number, tx_index, log_index)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordOrderingKey {
    pub block_number: u64,
    pub tx_index: u64,
    pub log_index: u64,
}

impl RecordOrderingKey {
    pub fn from_record(record: &ChainRecord) -> Self {
        RecordOrderingKey {
            block_number: record.ctx.block_number,
            tx_index: record.ctx.tx_index,
            log_index: record.ctx.log_index,
        }
    }
}

/// Sort records into canonical processing order.
pub fn sort_records_deterministic(records: &mut [ChainRecord]) {
    records.sort_by_key(RecordOrderingKey::from_record);
}
