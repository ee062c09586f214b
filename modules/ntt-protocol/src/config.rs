//! Deployment configuration, loaded from JSON.
//!
//! ```json
//! {
//!   "network": "Testnet",
//!   "chain": 10002,
//!   "mode": "locking",
//!   "token_decimals": 18,
//!   "outbound_limit": 1000000000000,
//!   "contracts": {
//!     "ntt": {
//!       "manager": "0x06413c42e913327Bc9a08B7C1E362BAE7C0b9598",
//!       "token": "0x738141EFf659625F2eAD4feECDfCD94155C67f18",
//!       "transceiver": { "wormhole": "0x649fF7B32C2DE771043ea105c4aAb2D724497238" }
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, fmt};

use ntt_messages::{
    chain_id::ChainId, transceiver::TransceiverPrefix, universal_address::UniversalAddress,
};
use serde::{Deserialize, Serialize};

use crate::{
    clock::UnixTimestamp,
    error::{NttError, Result},
    queue::rate_limit::RateLimitState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether the manager burns and mints, or locks and unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Locking,
    Burning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransceiverContracts {
    pub wormhole: UniversalAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NttContracts {
    pub manager: UniversalAddress,
    pub token: UniversalAddress,
    pub transceiver: TransceiverContracts,
    #[serde(default)]
    pub quoter: Option<UniversalAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    #[serde(default)]
    pub ntt: Option<NttContracts>,
}

/// Pricing for automatic relaying. When absent the adapter does not offer
/// relaying at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Flat fee charged per delivery, in native gas units of this chain.
    pub base_fee: u64,
    /// Route deliveries to the specialized relayer instead of the standard one.
    #[serde(default)]
    pub specialized: bool,
}

fn default_rate_limit_duration() -> UnixTimestamp {
    RateLimitState::DEFAULT_DURATION
}

fn default_transceiver_prefixes() -> Vec<TransceiverPrefix> {
    vec![TransceiverPrefix::WORMHOLE]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NttConfig {
    pub network: Network,
    pub chain: ChainId,
    pub mode: Mode,
    pub token_decimals: u8,
    pub outbound_limit: u64,
    /// Time for a drained limiter to refill, in seconds. Also the delay
    /// imposed on queued transfers.
    #[serde(default = "default_rate_limit_duration")]
    pub rate_limit_duration: UnixTimestamp,
    /// Accepted transceiver prefixes, in the order they are tried on decode.
    #[serde(default = "default_transceiver_prefixes")]
    pub transceiver_prefixes: Vec<TransceiverPrefix>,
    #[serde(default)]
    pub relayer: Option<RelayerConfig>,
    #[serde(default)]
    pub contracts: Contracts,
}

impl NttConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The NTT contracts, which every adapter needs to be constructed.
    pub fn ntt_contracts(&self) -> Result<&NttContracts> {
        self.contracts.ntt.as_ref().ok_or_else(|| {
            NttError::ConfigurationMissing(format!("no NTT contracts for chain {}", self.chain))
        })
    }
}

/// One [`NttConfig`] per chain, keyed by chain id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainsConfig {
    pub chains: BTreeMap<ChainId, NttConfig>,
}

impl ChainsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, config: NttConfig) -> Option<NttConfig> {
        self.chains.insert(config.chain, config)
    }

    /// Looks up the configuration of `chain`, checking that it was written
    /// for `network`.
    pub fn for_chain(&self, network: Network, chain: ChainId) -> Result<&NttConfig> {
        let config = self.chains.get(&chain).ok_or_else(|| {
            NttError::ConfigurationMissing(format!("no configuration for chain {chain}"))
        })?;
        if config.network != network {
            return Err(NttError::NetworkMismatch {
                configured: config.network,
                requested: network,
            });
        }
        Ok(config)
    }
}
