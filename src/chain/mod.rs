//! Point-in-time contract-state reads.
//!
//! Every accessor is a possibly-reverting lookup: older contract versions
//! simply do not implement some of these. A revert is "value unavailable",
//! never a hard error; call sites fold it into a documented default
//! immediately (zero for amounts, the zero address for addresses, false
//! for flags).

pub mod fixture;

pub use fixture::{ContractFixture, FixtureChainState};

use crate::domain::{Address, Amount};

/// Marker for a reverted contract-state read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reverted;

pub type CallResult<T> = Result<T, Reverted>;

/// Revert-tolerant accessor capability over contract state, as of the
/// block being processed. Synchronous, side-effect free.
///
/// Default implementations revert, matching a contract that implements
/// none of the optional interface.
pub trait ChainState: Send + Sync {
    // -- vault accessors ---------------------------------------------------
    fn total_assets(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn total_supply(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn price_per_share(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn api_version(&self, _contract: &Address) -> CallResult<String> {
        Err(Reverted)
    }
    fn token(&self, _vault: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn rewards(&self, _contract: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn management(&self, _vault: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn guardian(&self, _vault: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn governance(&self, _vault: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn deposit_limit(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn available_deposit_limit(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn management_fee(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn performance_fee(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }
    fn activation(&self, _vault: &Address) -> CallResult<Amount> {
        Err(Reverted)
    }

    // -- strategy accessors ------------------------------------------------
    fn strategy_name(&self, _strategy: &Address) -> CallResult<String> {
        Err(Reverted)
    }
    fn strategy_keeper(&self, _strategy: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn strategy_strategist(&self, _strategy: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn strategy_emergency_exit(&self, _strategy: &Address) -> CallResult<bool> {
        Err(Reverted)
    }
    fn strategy_health_check(&self, _strategy: &Address) -> CallResult<Address> {
        Err(Reverted)
    }
    fn strategy_do_health_check(&self, _strategy: &Address) -> CallResult<bool> {
        Err(Reverted)
    }
    fn strategy_vault(&self, _strategy: &Address) -> CallResult<Address> {
        Err(Reverted)
    }

    // -- token accessors ---------------------------------------------------
    fn token_decimals(&self, _token: &Address) -> CallResult<u32> {
        Err(Reverted)
    }
    fn token_symbol(&self, _token: &Address) -> CallResult<String> {
        Err(Reverted)
    }
    fn token_name(&self, _token: &Address) -> CallResult<String> {
        Err(Reverted)
    }
}

/// A chain state where every read reverts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChainState;

impl ChainState for NullChainState {}

pub fn amount_or_zero(result: CallResult<Amount>) -> Amount {
    result.unwrap_or_else(|_| Amount::zero())
}

pub fn address_or_zero(result: CallResult<Address>) -> Address {
    result.unwrap_or_else(|_| Address::zero())
}

pub fn bool_or_false(result: CallResult<bool>) -> bool {
    result.unwrap_or(false)
}

pub fn string_or(result: CallResult<String>, default: &str) -> String {
    result.unwrap_or_else(|_| default.to_string())
}
