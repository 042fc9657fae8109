//! USD price resolution.
//!
//! A token amount resolves to a USD-stable-coin value through a cascade of
//! sources, each attempted only when the previous one produced the zero
//! sentinel: direct oracle lookup, share-price derivation for vault share
//! tokens, AMM-router quoting, and a liquidity-pool discovery step that
//! prices the pool's underlying coin. Every source call may revert; total
//! failure yields zero, which is a normal, loggable condition.

pub mod networks;

pub use networks::{Network, PriceSourceAddresses};

use tracing::{debug, info, warn};

use crate::chain::{CallResult, ChainState};
use crate::domain::{Address, Amount};
use crate::entities::Vault;
use crate::store::EntityStore;

/// Direct USD oracle (`getNormalizedValueUsdc` / `getPriceUsdcRecommended`).
pub trait OracleSource: Send + Sync {
    fn normalized_value_usd(&self, token: &Address, amount: &Amount) -> CallResult<Amount>;
    fn price_usd(&self, token: &Address) -> CallResult<Amount>;
}

/// Constant-product AMM quoting (`getPriceUsdc`): USD value of one whole
/// token, in stable-coin base units.
pub trait AmmSource: Send + Sync {
    fn price_usd(&self, token: &Address) -> CallResult<Amount>;
}

/// Liquidity-pool discovery: token to pool, pool to underlying coin.
pub trait PoolSource: Send + Sync {
    fn pool_for(&self, token: &Address) -> CallResult<Address>;
    fn underlying_coin(&self, pool: &Address) -> CallResult<Address>;
}

/// Bound on share-price derivation through nested vault share tokens.
const MAX_DERIVATION_DEPTH: u32 = 4;

/// The price cascade. Sources are optional; a missing source behaves like
/// one whose calls always revert.
pub struct UsdPriceResolver {
    oracle: Option<Box<dyn OracleSource>>,
    amm: Option<Box<dyn AmmSource>>,
    pool: Option<Box<dyn PoolSource>>,
}

impl UsdPriceResolver {
    pub fn new(
        oracle: Option<Box<dyn OracleSource>>,
        amm: Option<Box<dyn AmmSource>>,
        pool: Option<Box<dyn PoolSource>>,
    ) -> Self {
        UsdPriceResolver { oracle, amm, pool }
    }

    /// A resolver with no sources: every lookup yields the zero sentinel.
    pub fn disabled() -> Self {
        UsdPriceResolver {
            oracle: None,
            amm: None,
            pool: None,
        }
    }

    /// Resolve the USD value of `amount` units of `token`. Never fails;
    /// zero means "no price available".
    pub fn resolve(
        &self,
        store: &EntityStore,
        chain: &dyn ChainState,
        token: &Address,
        amount: &Amount,
    ) -> Amount {
        self.resolve_at_depth(store, chain, token, amount, 0)
    }

    fn resolve_at_depth(
        &self,
        store: &EntityStore,
        chain: &dyn ChainState,
        token: &Address,
        amount: &Amount,
        depth: u32,
    ) -> Amount {
        if depth > MAX_DERIVATION_DEPTH {
            warn!(token = %token, "price derivation depth exceeded");
            return Amount::zero();
        }

        let oracle_value = self.from_oracle(token, amount);
        if !oracle_value.is_zero() {
            return oracle_value;
        }
        debug!(token = %token, "oracle had no price");

        let share_value = self.from_share_price(store, chain, token, amount, depth);
        if !share_value.is_zero() {
            return share_value;
        }
        debug!(token = %token, "share-price derivation had no price");

        let decimals = token_decimals(store, chain, token);
        let amm_value = self.from_amm(token, amount, decimals);
        if !amm_value.is_zero() {
            return amm_value;
        }
        debug!(token = %token, "AMM calculator had no price");

        let pool_value = self.from_pool(token, amount, decimals);
        if !pool_value.is_zero() {
            return pool_value;
        }

        info!(token = %token, amount = %amount, "no price source resolved, using zero");
        Amount::zero()
    }

    /// Oracle price of one whole token; zero when unavailable. Used by the
    /// day-bucket aggregator, which stores a per-token price rather than a
    /// valued amount.
    pub fn price_per_token(&self, token: &Address) -> Amount {
        match &self.oracle {
            Some(oracle) => match oracle.price_usd(token) {
                Ok(price) => price,
                Err(_) => {
                    debug!(token = %token, "oracle reverted on per-token price");
                    Amount::zero()
                }
            },
            None => Amount::zero(),
        }
    }

    fn from_oracle(&self, token: &Address, amount: &Amount) -> Amount {
        match &self.oracle {
            Some(oracle) => oracle
                .normalized_value_usd(token, amount)
                .unwrap_or_else(|_| Amount::zero()),
            None => Amount::zero(),
        }
    }

    /// If the token is a known vault's share token, price
    /// `amount * pricePerShare` of the vault's underlying asset.
    fn from_share_price(
        &self,
        store: &EntityStore,
        chain: &dyn ChainState,
        token: &Address,
        amount: &Amount,
        depth: u32,
    ) -> Amount {
        let Some(vault) = store.vaults.get(&Vault::build_id(token)) else {
            return Amount::zero();
        };
        let Ok(price_per_share) = chain.price_per_share(token) else {
            return Amount::zero();
        };
        let share_decimals = token_decimals(store, chain, token);
        let underlying_equivalent =
            amount.mul_div(&price_per_share, &Amount::pow10(share_decimals));
        let Ok(underlying) = Address::parse(&vault.token) else {
            return Amount::zero();
        };
        self.resolve_at_depth(store, chain, &underlying, &underlying_equivalent, depth + 1)
    }

    fn from_amm(&self, token: &Address, amount: &Amount, decimals: u32) -> Amount {
        match &self.amm {
            Some(amm) => match amm.price_usd(token) {
                Ok(price) => amount.mul_div(&price, &Amount::pow10(decimals)),
                Err(_) => Amount::zero(),
            },
            None => Amount::zero(),
        }
    }

    fn from_pool(&self, token: &Address, amount: &Amount, decimals: u32) -> Amount {
        let Some(pool_source) = &self.pool else {
            return Amount::zero();
        };
        let Ok(pool) = pool_source.pool_for(token) else {
            debug!(token = %token, "no pool for token");
            return Amount::zero();
        };
        let Ok(underlying) = pool_source.underlying_coin(&pool) else {
            debug!(token = %token, pool = %pool, "no underlying coin for pool");
            return Amount::zero();
        };
        self.from_amm(&underlying, amount, decimals)
    }
}

/// Token decimals from the entity store when known, the chain otherwise,
/// 18 as the last resort.
pub fn token_decimals(store: &EntityStore, chain: &dyn ChainState, token: &Address) -> u32 {
    if let Some(entity) = store.tokens.get(token.as_str()) {
        return entity.decimals;
    }
    chain.token_decimals(token).unwrap_or(18)
}
