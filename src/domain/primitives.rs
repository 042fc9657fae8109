//! Chain primitives: Address, TxHash, TimeMs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Milliseconds in one UTC day.
pub const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("address must be {expected} hex characters, got {got}: {value}")]
    BadLength {
        expected: usize,
        got: usize,
        value: String,
    },
    #[error("address contains non-hex characters: {0}")]
    NotHex(String),
}

fn parse_hex_string(value: &str, hex_len: usize) -> Result<String, AddressParseError> {
    let Some(body) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) else {
        return Err(AddressParseError::MissingPrefix(value.to_string()));
    };
    if body.len() != hex_len {
        return Err(AddressParseError::BadLength {
            expected: hex_len,
            got: body.len(),
            value: value.to_string(),
        });
    }
    if hex::decode(body).is_err() {
        return Err(AddressParseError::NotHex(value.to_string()));
    }
    Ok(format!("0x{}", body.to_lowercase()))
}

/// A contract or account address: lower-case, `0x`-prefixed, 40 hex digits.
///
/// Normalization happens here, once, at ingestion. Mixed-case (checksummed)
/// input is accepted and lower-cased; anything that is not hex is rejected,
/// so the same address can never key two distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address.
    pub fn parse(value: &str) -> Result<Self, AddressParseError> {
        parse_hex_string(value, 40).map(Address)
    }

    /// The zero address.
    pub fn zero() -> Self {
        Address(format!("0x{}", "0".repeat(40)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.bytes().skip(2).all(|b| b == b'0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A transaction hash: lower-case, `0x`-prefixed, 64 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(value: &str) -> Result<Self, AddressParseError> {
        parse_hex_string(value, 64).map(TxHash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TxHash {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TxHash::parse(s)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TxHash::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Time in milliseconds since Unix epoch.
///
/// Chain block timestamps arrive in seconds; the projection stores
/// milliseconds everywhere (`from_seconds` is the single conversion point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Convert a chain timestamp (seconds) to milliseconds.
    pub fn from_seconds(seconds: i64) -> Self {
        TimeMs(seconds * 1000)
    }

    pub fn as_ms(&self) -> i64 {
        self.0
    }

    /// UTC day bucket index: `floor(ms / 86400000)`.
    pub fn day_index(&self) -> i64 {
        self.0.div_euclid(MS_PER_DAY)
    }

    /// Millisecond timestamp of the start of this timestamp's UTC day.
    pub fn day_start(&self) -> TimeMs {
        TimeMs(self.day_index() * MS_PER_DAY)
    }

    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.0)
    }
}

impl std::fmt::Display for TimeMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalizes_case() {
        let mixed = "0xDe0B295669a9FD93d5F28D9Ec85E40f4cb697BAe";
        let addr = Address::parse(mixed).unwrap();
        assert_eq!(addr.as_str(), "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae");
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!(
            Address::parse("de0b295669a9fd93d5f28d9ec85e40f4cb697bae"),
            Err(AddressParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            Address::parse("0x1234"),
            Err(AddressParseError::BadLength { .. })
        ));
        assert!(matches!(
            Address::parse("0xzz0b295669a9fd93d5f28d9ec85e40f4cb697bae"),
            Err(AddressParseError::NotHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        let zero = Address::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.as_str(), "0x0000000000000000000000000000000000000000");
        let nonzero = Address::parse("0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae").unwrap();
        assert!(!nonzero.is_zero());
    }

    #[test]
    fn test_address_serde_normalizes() {
        let addr: Address =
            serde_json::from_str("\"0xDE0B295669a9FD93d5F28D9Ec85E40f4cb697BAe\"").unwrap();
        assert_eq!(
            serde_json::to_string(&addr).unwrap(),
            "\"0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae\""
        );
    }

    #[test]
    fn test_tx_hash_roundtrip() {
        let raw = "0x6b51f1f743ec7a42db6ba1995e4ade2ba0e5b8f1fec03d3dd599a90da66d6f69";
        let hash = TxHash::parse(raw).unwrap();
        assert_eq!(hash.as_str(), raw);
        assert!(TxHash::parse("0x1234").is_err());
    }

    #[test]
    fn test_time_ms_from_seconds() {
        assert_eq!(TimeMs::from_seconds(1640995200).as_ms(), 1640995200000);
    }

    #[test]
    fn test_day_index_and_start() {
        let t = TimeMs::new(1640995200000 + 12 * 3600 * 1000);
        assert_eq!(t.day_index(), 1640995200000 / MS_PER_DAY);
        assert_eq!(t.day_start().as_ms(), 1640995200000);
    }
}
