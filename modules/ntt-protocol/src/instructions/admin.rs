use ntt_messages::{chain_id::ChainId, transceivers::wormhole::WormholeTransceiverRegistration};

use crate::{
    clock::UnixTimestamp,
    error::{NttError, Result},
    ntt::ChainAddress,
    peer::{NttManagerPeer, PeerConfig},
    queue::rate_limit::RateLimitState,
    state::NttState,
};

// * Peers

/// Registers (or updates) the manager peer on `peer.chain` and its inbound
/// limit.
///
/// Calling this again with the same arguments changes nothing: an existing
/// limiter keeps its capacity when the limit is unchanged.
pub fn set_peer(
    state: &mut NttState,
    peer: ChainAddress,
    token_decimals: u8,
    inbound_limit: u64,
    now: UnixTimestamp,
) -> Result<PeerConfig> {
    if peer.chain == state.config.chain {
        return Err(NttError::InvalidPeerChain(peer.chain));
    }

    state.peers.insert(
        peer.chain,
        NttManagerPeer {
            address: peer.address,
            token_decimals,
        },
    );

    let duration = state.config.rate_limit_duration;
    state
        .inbox_rate_limits
        .entry(peer.chain)
        .and_modify(|rate_limit| rate_limit.set_limit(inbound_limit, now))
        .or_insert_with(|| RateLimitState::new(inbound_limit, now, duration));

    Ok(PeerConfig {
        chain: peer.chain,
        manager_address: peer.address,
        token_decimals,
        inbound_limit,
    })
}

pub fn set_transceiver_peer(
    state: &mut NttState,
    peer: ChainAddress,
) -> Result<WormholeTransceiverRegistration> {
    if peer.chain == state.config.chain {
        return Err(NttError::InvalidPeerChain(peer.chain));
    }

    state.transceiver_peers.insert(peer.chain, peer.address);

    Ok(WormholeTransceiverRegistration {
        chain_id: peer.chain,
        transceiver_address: peer.address,
    })
}

// * Limits

pub fn set_outbound_limit(state: &mut NttState, limit: u64, now: UnixTimestamp) {
    state.outbox_rate_limit.set_limit(limit, now);
}

pub fn set_inbound_limit(
    state: &mut NttState,
    chain: ChainId,
    limit: u64,
    now: UnixTimestamp,
) -> Result<()> {
    state.inbox_rate_limit_mut(chain)?.set_limit(limit, now);
    Ok(())
}

// * Pausing

pub fn set_paused(state: &mut NttState, paused: bool) {
    state.config.paused = paused;
}

#[cfg(test)]
mod test {
    use ntt_messages::universal_address::UniversalAddress;

    use super::*;
    use crate::state::test_support::{state, LOCAL_CHAIN};

    fn peer() -> ChainAddress {
        ChainAddress::new(ChainId::SUI, UniversalAddress::new([5; 32]))
    }

    #[test]
    fn test_set_peer_is_idempotent() {
        let mut state = state();
        set_peer(&mut state, peer(), 6, 1_000, 0).unwrap();
        state
            .inbox_rate_limit_mut(ChainId::SUI)
            .unwrap()
            .consume_or_delay(400, 0);

        let config = set_peer(&mut state, peer(), 6, 1_000, 0).unwrap();
        assert_eq!(state.peer_config(ChainId::SUI), Some(config));
        assert_eq!(
            state.inbox_rate_limit(ChainId::SUI).unwrap().capacity_at(0),
            600
        );
    }

    #[test]
    fn test_set_peer_rejects_local_chain() {
        let mut state = state();
        let local = ChainAddress::new(state.config.chain, UniversalAddress::new([5; 32]));
        assert!(matches!(
            set_peer(&mut state, local, 6, 1_000, 0),
            Err(NttError::InvalidPeerChain(chain)) if chain == LOCAL_CHAIN
        ));
        assert!(matches!(
            set_transceiver_peer(&mut state, local),
            Err(NttError::InvalidPeerChain(chain)) if chain == LOCAL_CHAIN
        ));
    }

    #[test]
    fn test_set_transceiver_peer() {
        let mut state = state();
        let registration = set_transceiver_peer(&mut state, peer()).unwrap();
        assert_eq!(registration.chain_id, ChainId::SUI);
        assert_eq!(
            state.transceiver_peer(ChainId::SUI).unwrap(),
            UniversalAddress::new([5; 32])
        );
    }

    #[test]
    fn test_set_inbound_limit_needs_peer() {
        let mut state = state();
        assert!(matches!(
            set_inbound_limit(&mut state, ChainId::SUI, 5, 0),
            Err(NttError::UnknownPeer(ChainId::SUI))
        ));
    }
}
