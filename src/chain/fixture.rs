//! Fixture-backed chain state.
//!
//! Offline runs and tests supply contract state as a JSON document keyed
//! by contract address; any field a fixture omits reverts, exactly like a
//! contract that does not implement the accessor.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Deserialize;

use crate::chain::{CallResult, ChainState, Reverted};
use crate::domain::{Address, Amount};

/// Accessor values for one contract. Every field is optional; a missing
/// field reverts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContractFixture {
    pub total_assets: Option<Amount>,
    pub total_supply: Option<Amount>,
    pub price_per_share: Option<Amount>,
    pub api_version: Option<String>,
    pub token: Option<Address>,
    pub rewards: Option<Address>,
    pub management: Option<Address>,
    pub guardian: Option<Address>,
    pub governance: Option<Address>,
    pub deposit_limit: Option<Amount>,
    pub available_deposit_limit: Option<Amount>,
    pub management_fee: Option<Amount>,
    pub performance_fee: Option<Amount>,
    pub activation: Option<Amount>,
    pub name: Option<String>,
    pub keeper: Option<Address>,
    pub strategist: Option<Address>,
    pub emergency_exit: Option<bool>,
    pub health_check: Option<Address>,
    pub do_health_check: Option<bool>,
    pub vault: Option<Address>,
    pub decimals: Option<u32>,
    pub symbol: Option<String>,
    pub token_name: Option<String>,
}

/// Chain state backed by per-address fixtures; mutable behind a lock so
/// tests can move contract state between records.
#[derive(Debug, Default)]
pub struct FixtureChainState {
    contracts: RwLock<HashMap<String, ContractFixture>>,
}

impl FixtureChainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON object of `address -> fixture`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<Address, ContractFixture> = serde_json::from_str(json)?;
        let contracts = raw
            .into_iter()
            .map(|(addr, fixture)| (addr.to_string(), fixture))
            .collect();
        Ok(FixtureChainState {
            contracts: RwLock::new(contracts),
        })
    }

    /// Insert or replace the fixture for a contract.
    pub fn set(&self, address: &Address, fixture: ContractFixture) {
        if let Ok(mut contracts) = self.contracts.write() {
            contracts.insert(address.to_string(), fixture);
        }
    }

    /// Update a single contract's fixture in place.
    pub fn update<F: FnOnce(&mut ContractFixture)>(&self, address: &Address, apply: F) {
        if let Ok(mut contracts) = self.contracts.write() {
            apply(contracts.entry(address.to_string()).or_default());
        }
    }

    fn read<T, F>(&self, address: &Address, get: F) -> CallResult<T>
    where
        F: FnOnce(&ContractFixture) -> Option<T>,
    {
        let contracts = self.contracts.read().map_err(|_| Reverted)?;
        contracts
            .get(address.as_str())
            .and_then(get)
            .ok_or(Reverted)
    }
}

impl ChainState for FixtureChainState {
    fn total_assets(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.total_assets.clone())
    }

    fn total_supply(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.total_supply.clone())
    }

    fn price_per_share(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.price_per_share.clone())
    }

    fn api_version(&self, contract: &Address) -> CallResult<String> {
        self.read(contract, |c| c.api_version.clone())
    }

    fn token(&self, vault: &Address) -> CallResult<Address> {
        self.read(vault, |c| c.token.clone())
    }

    fn rewards(&self, contract: &Address) -> CallResult<Address> {
        self.read(contract, |c| c.rewards.clone())
    }

    fn management(&self, vault: &Address) -> CallResult<Address> {
        self.read(vault, |c| c.management.clone())
    }

    fn guardian(&self, vault: &Address) -> CallResult<Address> {
        self.read(vault, |c| c.guardian.clone())
    }

    fn governance(&self, vault: &Address) -> CallResult<Address> {
        self.read(vault, |c| c.governance.clone())
    }

    fn deposit_limit(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.deposit_limit.clone())
    }

    fn available_deposit_limit(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.available_deposit_limit.clone())
    }

    fn management_fee(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.management_fee.clone())
    }

    fn performance_fee(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.performance_fee.clone())
    }

    fn activation(&self, vault: &Address) -> CallResult<Amount> {
        self.read(vault, |c| c.activation.clone())
    }

    fn strategy_name(&self, strategy: &Address) -> CallResult<String> {
        self.read(strategy, |c| c.name.clone())
    }

    fn strategy_keeper(&self, strategy: &Address) -> CallResult<Address> {
        self.read(strategy, |c| c.keeper.clone())
    }

    fn strategy_strategist(&self, strategy: &Address) -> CallResult<Address> {
        self.read(strategy, |c| c.strategist.clone())
    }

    fn strategy_emergency_exit(&self, strategy: &Address) -> CallResult<bool> {
        self.read(strategy, |c| c.emergency_exit)
    }

    fn strategy_health_check(&self, strategy: &Address) -> CallResult<Address> {
        self.read(strategy, |c| c.health_check.clone())
    }

    fn strategy_do_health_check(&self, strategy: &Address) -> CallResult<bool> {
        self.read(strategy, |c| c.do_health_check)
    }

    fn strategy_vault(&self, strategy: &Address) -> CallResult<Address> {
        self.read(strategy, |c| c.vault.clone())
    }

    fn token_decimals(&self, token: &Address) -> CallResult<u32> {
        self.read(token, |c| c.decimals)
    }

    fn token_symbol(&self, token: &Address) -> CallResult<String> {
        self.read(token, |c| c.symbol.clone())
    }

    fn token_name(&self, token: &Address) -> CallResult<String> {
        self.read(token, |c| c.token_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_missing_contract_reverts() {
        let chain = FixtureChainState::new();
        assert_eq!(chain.total_assets(&addr(1)), Err(Reverted));
    }

    #[test]
    fn test_missing_field_reverts() {
        let chain = FixtureChainState::new();
        chain.set(
            &addr(1),
            ContractFixture {
                total_assets: Some(Amount::from_u64(100)),
                ..Default::default()
            },
        );
        assert_eq!(chain.total_assets(&addr(1)), Ok(Amount::from_u64(100)));
        assert_eq!(chain.total_supply(&addr(1)), Err(Reverted));
    }

    #[test]
    fn test_update_in_place() {
        let chain = FixtureChainState::new();
        chain.update(&addr(1), |c| c.total_supply = Some(Amount::from_u64(7)));
        chain.update(&addr(1), |c| c.total_assets = Some(Amount::from_u64(9)));
        assert_eq!(chain.total_supply(&addr(1)), Ok(Amount::from_u64(7)));
        assert_eq!(chain.total_assets(&addr(1)), Ok(Amount::from_u64(9)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "0x0000000000000000000000000000000000000001": {
                "api_version": "0.4.3",
                "total_assets": "1000"
            }
        }"#;
        let chain = FixtureChainState::from_json(json).unwrap();
        assert_eq!(chain.api_version(&addr(1)), Ok("0.4.3".to_string()));
        assert_eq!(
            chain.total_assets(&addr(1)),
            Ok(Amount::from_u64(1000))
        );
    }
}
