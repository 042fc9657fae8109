//! Unbounded integer token amounts.
//!
//! Vault quantities are uint256-scale integers (shares, underlying units,
//! USD values in stable-coin base units). Arithmetic follows contract
//! semantics: truncating integer division, no rounding.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid integer amount: {0}")]
pub struct AmountParseError(String);

/// An unbounded signed integer quantity.
///
/// Serializes as a decimal string so uint256-scale values survive JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigInt);

impl Amount {
    pub fn zero() -> Self {
        Amount(BigInt::zero())
    }

    pub fn from_u64(value: u64) -> Self {
        Amount(BigInt::from(value))
    }

    /// Parse a decimal string (optionally negative).
    pub fn from_str_canonical(s: &str) -> Result<Self, AmountParseError> {
        BigInt::from_str(s.trim())
            .map(Amount)
            .map_err(|_| AmountParseError(s.to_string()))
    }

    pub fn to_canonical_string(&self) -> String {
        self.0.to_string()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// `10^exp`, the divisor for a token with `exp` decimals.
    pub fn pow10(exp: u32) -> Self {
        Amount(num_traits::pow(BigInt::from(10u8), exp as usize))
    }

    /// The uint256 maximum, used by vault contracts as a "deposit all"
    /// sentinel.
    pub fn max_uint256() -> Self {
        Amount(BigInt::from_bytes_be(num_bigint::Sign::Plus, &[0xff; 32]))
    }

    /// Narrow to u64 when the value fits; None otherwise (or negative).
    pub fn to_u64(&self) -> Option<u64> {
        use num_traits::ToPrimitive;
        self.0.to_u64()
    }

    /// `self * mul / div` with truncating division; zero when `div` is zero.
    pub fn mul_div(&self, mul: &Amount, div: &Amount) -> Amount {
        if div.is_zero() {
            return Amount::zero();
        }
        Amount(&self.0 * &mul.0 / &div.0)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_str_canonical(s)
    }
}

impl std::ops::Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl std::ops::Sub for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl std::ops::Mul for &Amount {
    type Output = Amount;

    fn mul(self, rhs: &Amount) -> Amount {
        Amount(&self.0 * &rhs.0)
    }
}

impl std::ops::Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a decimal integer string or integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                Amount::from_str_canonical(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(BigInt::from(v)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount(BigInt::from(v)))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
