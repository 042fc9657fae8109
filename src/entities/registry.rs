//! Registry entity.

use serde::Serialize;

use crate::domain::{Address, TimeMs};

/// A vault registry contract and the vaults it has surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registry {
    pub id: String,
    pub address: Address,
    /// Transaction of the most recent registry event.
    pub transaction: String,
    pub timestamp: TimeMs,
    pub block_number: u64,
    pub released_vaults: Vec<String>,
    pub endorsed_vaults: Vec<String>,
    pub experimental_vaults: Vec<String>,
}

impl Registry {
    pub fn build_id(address: &Address) -> String {
        address.to_string()
    }
}
