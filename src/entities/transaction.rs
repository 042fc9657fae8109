//! Transaction, Account and Token entities.

use serde::Serialize;

use crate::domain::{Address, Amount, TimeMs, TxHash};

/// Canonical transaction record, one per `(txHash, logIndex)` pair.
///
/// Immutable once created; re-deriving the same pair must reuse the
/// existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub tx_hash: TxHash,
    pub log_index: u64,
    pub tx_index: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub value: Amount,
    pub gas_price: Amount,
    pub gas_limit: Amount,
    pub block_number: u64,
    /// Block timestamp in milliseconds.
    pub timestamp: TimeMs,
    /// Human-readable cause label, diagnostics only (not part of identity).
    pub cause: String,
}

impl Transaction {
    /// `{txHashHex}-{logIndex}`
    pub fn build_id(tx_hash: &TxHash, log_index: u64) -> String {
        format!("{}-{}", tx_hash, log_index)
    }
}

/// An externally-owned or contract account; created lazily on first
/// reference, no mutable fields beyond identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub address: Address,
}

impl Account {
    pub fn build_id(address: &Address) -> String {
        address.to_string()
    }

    pub fn new(address: Address) -> Self {
        Account {
            id: Self::build_id(&address),
            address,
        }
    }
}

/// An ERC-20 token referenced by a vault (underlying or share token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub id: String,
    pub address: Address,
    pub decimals: u32,
    pub symbol: String,
    pub name: String,
}

impl Token {
    pub fn build_id(address: &Address) -> String {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_format() {
        let hash = TxHash::parse(&format!("0x{:064x}", 0xabcdef)).unwrap();
        assert_eq!(
            Transaction::build_id(&hash, 7),
            format!("{}-7", hash.as_str())
        );
    }

    #[test]
    fn test_account_id_is_address() {
        let addr = Address::parse("0x557cde75c38b2962be3ca94dced614da774c95b0").unwrap();
        assert_eq!(
            Account::new(addr.clone()).id,
            "0x557cde75c38b2962be3ca94dced614da774c95b0"
        );
    }
}
