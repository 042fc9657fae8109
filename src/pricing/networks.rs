//! Static per-network price-source addresses, resolved once at startup.

use crate::domain::Address;

/// Supported chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    EthMainnet,
    FtmMainnet,
    ArbMainnet,
}

impl Network {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mainnet" => Some(Network::EthMainnet),
            "fantom" => Some(Network::FtmMainnet),
            "arbitrum-one" => Some(Network::ArbMainnet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::EthMainnet => "mainnet",
            Network::FtmMainnet => "fantom",
            Network::ArbMainnet => "arbitrum-one",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The concrete oracle/calculator contract addresses for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSourceAddresses {
    pub usd_oracle: Address,
    pub amm_calculator: Address,
    pub pool_calculator: Option<Address>,
}

fn addr(hex: &str) -> Address {
    // The tables below are compile-time constants; a bad literal is a bug.
    Address::parse(hex).expect("static price source address")
}

impl PriceSourceAddresses {
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::EthMainnet => PriceSourceAddresses {
                usd_oracle: addr("0x83d95e0d5f402511db06817aff3f9ea88224b030"),
                amm_calculator: addr("0x8263e161A855B644f582d9C164C66aABEe53f927"),
                pool_calculator: Some(addr("0x25BF7b72815476Dd515044F9650Bf79bAd0Df655")),
            },
            Network::FtmMainnet => PriceSourceAddresses {
                usd_oracle: addr("0x57AA88A0810dfe3f9b71a9b179Dd8bF5F956C46A"),
                amm_calculator: addr("0xec7Ac8AC897f5082B2c3d4e8D2173F992A097F24"),
                pool_calculator: Some(addr("0x0b53e9df372e72d8fdcdbedfbb56059957a37128")),
            },
            Network::ArbMainnet => PriceSourceAddresses {
                usd_oracle: addr("0x043518AB266485dC085a1DB095B8d9C2Fc78E9b9"),
                amm_calculator: addr("0x5EA7E501c9A23F4A76Dc7D33a11D995B13a1dD25"),
                pool_calculator: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!(Network::parse("mainnet"), Some(Network::EthMainnet));
        assert_eq!(Network::parse("fantom"), Some(Network::FtmMainnet));
        assert_eq!(Network::parse("arbitrum-one"), Some(Network::ArbMainnet));
        assert_eq!(Network::parse("base"), None);
    }

    #[test]
    fn test_addresses_resolve_for_every_network() {
        for network in [Network::EthMainnet, Network::FtmMainnet, Network::ArbMainnet] {
            let addrs = PriceSourceAddresses::for_network(network);
            assert!(!addrs.usd_oracle.is_zero());
            assert!(!addrs.amm_calculator.is_zero());
        }
        assert!(PriceSourceAddresses::for_network(Network::ArbMainnet)
            .pool_calculator
            .is_none());
    }
}
