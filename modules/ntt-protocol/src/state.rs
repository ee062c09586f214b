//! The state one manager keeps: configuration, peers, limiters, queues and
//! the token ledger it moves funds in.
//!
//! Nothing here is synchronized. Callers serialize access, one mutation in
//! flight at a time.

use std::collections::{BTreeMap, HashMap};

use ntt_messages::{
    chain_id::ChainId, transceiver::TransceiverPrefix, universal_address::UniversalAddress,
};

use crate::{
    clock::UnixTimestamp,
    config::Mode,
    error::{NttError, Result},
    peer::{NttManagerPeer, PeerConfig},
    queue::{
        inbox::{InboxItem, InboxKey},
        outbox::OutboxItem,
        rate_limit::RateLimitState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    pub chain: ChainId,
    pub mode: Mode,
    pub token_decimals: u8,
    pub manager: UniversalAddress,
    pub token: UniversalAddress,
    pub transceiver: UniversalAddress,
    pub rate_limit_duration: UnixTimestamp,
    /// Accepted on inbound messages, tried in order.
    pub transceiver_prefixes: Vec<TransceiverPrefix>,
    pub paused: bool,
}

/// Token balances on the local chain.
///
/// In locking mode transferred funds sit in `custody`; in burning mode they
/// leave `total_supply`.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    balances: HashMap<UniversalAddress, u64>,
    custody: u64,
    total_supply: u64,
}

impl TokenLedger {
    pub fn balance_of(&self, account: &UniversalAddress) -> u64 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn custody(&self) -> u64 {
        self.custody
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn mint(&mut self, to: UniversalAddress, amount: u64) -> Result<()> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(NttError::Overflow)?;
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(NttError::Overflow)?;
        self.total_supply = total_supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    pub fn burn(&mut self, from: UniversalAddress, amount: u64) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    /// Moves `amount` from `from` into custody.
    pub fn lock(&mut self, from: UniversalAddress, amount: u64) -> Result<()> {
        let custody = self.custody.checked_add(amount).ok_or(NttError::Overflow)?;
        self.debit(from, amount)?;
        self.custody = custody;
        Ok(())
    }

    /// Moves `amount` out of custody to `to`.
    pub fn unlock(&mut self, to: UniversalAddress, amount: u64) -> Result<()> {
        if self.custody < amount {
            return Err(NttError::InsufficientFunds {
                required: amount,
                available: self.custody,
            });
        }
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(NttError::Overflow)?;
        self.custody -= amount;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Mints straight into custody, as liquidity for locking-mode unlocks.
    pub fn fund_custody(&mut self, amount: u64) -> Result<()> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(NttError::Overflow)?;
        let custody = self.custody.checked_add(amount).ok_or(NttError::Overflow)?;
        self.total_supply = total_supply;
        self.custody = custody;
        Ok(())
    }

    fn debit(&mut self, from: UniversalAddress, amount: u64) -> Result<()> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(NttError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NttState {
    pub config: ManagerConfig,
    pub ledger: TokenLedger,
    pub peers: BTreeMap<ChainId, NttManagerPeer>,
    pub transceiver_peers: BTreeMap<ChainId, UniversalAddress>,
    /// Global rate limit for all outbound transfers to all chains.
    pub outbox_rate_limit: RateLimitState,
    /// Inbound rate limit per source chain, created by `set_peer`.
    pub inbox_rate_limits: BTreeMap<ChainId, RateLimitState>,
    pub inbox: HashMap<InboxKey, InboxItem>,
    pub outbox: BTreeMap<u64, OutboxItem>,
    next_sequence: u64,
}

impl NttState {
    pub fn new(config: ManagerConfig, outbound_limit: u64, now: UnixTimestamp) -> Self {
        let outbox_rate_limit =
            RateLimitState::new(outbound_limit, now, config.rate_limit_duration);
        Self {
            config,
            ledger: TokenLedger::default(),
            peers: BTreeMap::new(),
            transceiver_peers: BTreeMap::new(),
            outbox_rate_limit,
            inbox_rate_limits: BTreeMap::new(),
            inbox: HashMap::new(),
            outbox: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    pub fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.config.paused {
            return Err(NttError::Paused);
        }
        Ok(())
    }

    pub fn peer(&self, chain: ChainId) -> Result<&NttManagerPeer> {
        self.peers.get(&chain).ok_or(NttError::UnknownPeer(chain))
    }

    pub fn transceiver_peer(&self, chain: ChainId) -> Result<UniversalAddress> {
        self.transceiver_peers
            .get(&chain)
            .copied()
            .ok_or(NttError::UnknownPeer(chain))
    }

    pub fn inbox_rate_limit(&self, chain: ChainId) -> Result<&RateLimitState> {
        self.inbox_rate_limits
            .get(&chain)
            .ok_or(NttError::UnknownPeer(chain))
    }

    pub fn inbox_rate_limit_mut(&mut self, chain: ChainId) -> Result<&mut RateLimitState> {
        self.inbox_rate_limits
            .get_mut(&chain)
            .ok_or(NttError::UnknownPeer(chain))
    }

    pub fn peer_config(&self, chain: ChainId) -> Option<PeerConfig> {
        let peer = self.peers.get(&chain)?;
        let rate_limit = self.inbox_rate_limits.get(&chain)?;
        Some(PeerConfig {
            chain,
            manager_address: peer.address,
            token_decimals: peer.token_decimals,
            inbound_limit: rate_limit.limit(),
        })
    }
}

/// The manager message id of outbound transfer `sequence`: the sequence as a
/// big-endian integer in the last 8 bytes.
pub fn message_id(sequence: u64) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[24..].copy_from_slice(&sequence.to_be_bytes());
    id
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const LOCAL_CHAIN: ChainId = ChainId::ETHEREUM;
    pub const MANAGER: UniversalAddress = UniversalAddress::new([0xEE; 32]);
    pub const OUTBOUND_LIMIT: u64 = 1_000_000_000_000;

    /// A locking-mode manager on Ethereum for a 9-decimal token, at time 0.
    pub fn state() -> NttState {
        NttState::new(
            ManagerConfig {
                chain: LOCAL_CHAIN,
                mode: Mode::Locking,
                token_decimals: 9,
                manager: MANAGER,
                token: UniversalAddress::new([0xE0; 32]),
                transceiver: UniversalAddress::new([0xE1; 32]),
                rate_limit_duration: RateLimitState::DEFAULT_DURATION,
                transceiver_prefixes: vec![TransceiverPrefix::WORMHOLE],
                paused: false,
            },
            OUTBOUND_LIMIT,
            0,
        )
    }
}
