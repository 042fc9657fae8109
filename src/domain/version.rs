//! Contract API versions.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported version string: {0}")]
pub struct VersionParseError(pub String);

/// A three-component dotted contract API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        ApiVersion {
            major,
            minor,
            patch,
        }
    }

    /// Componentwise left-to-right comparison: true on the first component
    /// where `self` strictly exceeds `other`, false on the first component
    /// where it is strictly less, false when all components are equal.
    pub fn is_greater_than(&self, other: &ApiVersion) -> bool {
        let lhs = [self.major, self.minor, self.patch];
        let rhs = [other.major, other.minor, other.patch];
        for (a, b) in lhs.iter().zip(rhs.iter()) {
            if a > b {
                return true;
            }
            if a < b {
                return false;
            }
        }
        false
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(VersionParseError(s.to_string()));
        }
        let mut nums = [0u32; 3];
        for (slot, part) in nums.iter_mut().zip(parts.iter()) {
            *slot = part
                .parse::<u32>()
                .map_err(|_| VersionParseError(s.to_string()))?;
        }
        Ok(ApiVersion::new(nums[0], nums[1], nums[2]))
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
