//! Domain types and determinism layer.
//!
//! - Unbounded integer amounts (uint256-scale) via the Amount wrapper
//! - Chain primitives: Address, TxHash, TimeMs
//! - The decoded event/call record model with multi-shape normalization
//! - Contract API versions and the componentwise comparison
//! - Stable record ordering for deterministic folding

pub mod amount;
pub mod ordering;
pub mod primitives;
pub mod record;
pub mod version;

pub use amount::{Amount, AmountParseError};
pub use ordering::{sort_records_deterministic, RecordOrderingKey};
pub use primitives::{Address, AddressParseError, TimeMs, TxHash, MS_PER_DAY};
pub use record::{
    ChainRecord, RecordContext, RecordPayload, StrategyAddition, StrategyReportParams,
};
pub use version::{ApiVersion, VersionParseError};
