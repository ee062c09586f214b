use std::collections::{btree_map::Entry, BTreeMap, HashSet};

use ntt_messages::{
    chain_id::ChainId,
    ntt::NativeTokenTransfer,
    ntt_manager::NttManagerMessage,
    transceiver::{TransceiverMessage, TransceiverPrefix},
    transceivers::wormhole::WormholeTransceiverPayload,
};

use crate::{
    clock::UnixTimestamp,
    config::Mode,
    error::{NttError, Result},
    instructions::release_inbound::{release_inbound, ReleasedTransfer},
    ntt::InboundQueuedTransfer,
    queue::{inbox::InboxItem, rate_limit::RateLimitResult},
    state::NttState,
    transaction::Attestation,
};

/// An attested transfer that passed every check and may be admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub from_chain: ChainId,
    pub message: NttManagerMessage<NativeTokenTransfer>,
    /// Untrimmed to local decimals.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    Released(ReleasedTransfer),
    Queued(InboundQueuedTransfer),
}

/// Checks an attestation against the configured peers without touching the
/// state.
pub fn validate(state: &NttState, attestation: &Attestation) -> Result<ValidatedTransfer> {
    state.ensure_not_paused()?;

    let from_chain = attestation.emitter_chain;
    let expected_emitter = state.transceiver_peer(from_chain)?;
    if expected_emitter != attestation.emitter_address {
        return Err(NttError::PeerMismatch {
            chain: from_chain,
            expected: expected_emitter,
            found: attestation.emitter_address,
        });
    }

    let (prefix, message) = TransceiverMessage::<Vec<u8>, Vec<u8>>::decode(
        &attestation.payload,
        &state.config.transceiver_prefixes,
    )?;
    let message = message.parse_manager_payload::<NttManagerMessage<NativeTokenTransfer>>()?;

    let peer = state.peer(from_chain)?;
    if peer.address != message.source_ntt_manager {
        return Err(NttError::PeerMismatch {
            chain: from_chain,
            expected: peer.address,
            found: message.source_ntt_manager,
        });
    }

    if message.recipient_ntt_manager != state.config.manager {
        return Err(NttError::InvalidRecipientManager {
            expected: state.config.manager,
            found: message.recipient_ntt_manager,
        });
    }

    // only the Wormhole layout is known here, other transceivers carry their own
    let message = if prefix == TransceiverPrefix::WORMHOLE {
        message
            .parse_transceiver_payload::<Option<WormholeTransceiverPayload>>()?
            .ntt_manager_payload
    } else {
        message.ntt_manager_payload
    };

    if message.payload.recipient_chain != state.config.chain {
        return Err(NttError::InvalidChainId {
            expected: state.config.chain,
            found: message.payload.recipient_chain,
        });
    }

    if state.inbox.contains_key(&(from_chain, message.id)) {
        return Err(NttError::AlreadyRedeemed {
            chain: from_chain,
            id: message.id,
        });
    }

    let amount = message
        .payload
        .trimmed_amount
        .untrim(state.config.token_decimals)?;
    let amount = u64::try_from(amount).map_err(|_| NttError::Overflow)?;

    Ok(ValidatedTransfer {
        from_chain,
        message,
        amount,
    })
}

/// Fails unless `amount` can be paid out of `custody` (locking) or minted on
/// top of `supply` (burning).
fn ensure_payable(mode: Mode, custody: u64, supply: u64, amount: u64) -> Result<()> {
    match mode {
        Mode::Locking if custody < amount => Err(NttError::InsufficientFunds {
            required: amount,
            available: custody,
        }),
        Mode::Burning if supply.checked_add(amount).is_none() => Err(NttError::Overflow),
        Mode::Locking | Mode::Burning => Ok(()),
    }
}

/// Admits an attested transfer into the inbox.
///
/// A transfer within the inbound capacity of its source chain is paid out
/// right away; anything larger is queued until the limiter's duration has
/// passed.
pub fn redeem(
    state: &mut NttState,
    attestation: &Attestation,
    now: UnixTimestamp,
) -> Result<RedeemOutcome> {
    let transfer = validate(state, attestation)?;

    // a payout that is due now must not fail after the limiter was consumed
    let capacity = state.inbox_rate_limit(transfer.from_chain)?.capacity_at(now);
    if capacity >= transfer.amount {
        ensure_payable(
            state.config.mode,
            state.ledger.custody(),
            state.ledger.total_supply(),
            transfer.amount,
        )?;
    }

    admit(state, transfer, now)
}

/// Redeems every attestation or none of them.
///
/// The whole batch is validated first, including replays within the batch
/// and the payouts it would make, so nothing past that point can fail.
pub fn redeem_batch(
    state: &mut NttState,
    attestations: &[Attestation],
    now: UnixTimestamp,
) -> Result<Vec<RedeemOutcome>> {
    let mut seen = HashSet::with_capacity(attestations.len());
    let mut transfers = Vec::with_capacity(attestations.len());
    for attestation in attestations {
        let transfer = validate(state, attestation)?;
        if !seen.insert((transfer.from_chain, transfer.message.id)) {
            return Err(NttError::AlreadyRedeemed {
                chain: transfer.from_chain,
                id: transfer.message.id,
            });
        }
        transfers.push(transfer);
    }

    // dry run on copies of the limiters and ledger totals the batch touches
    let mut limits = BTreeMap::new();
    let mut custody = state.ledger.custody();
    let mut supply = state.ledger.total_supply();
    for transfer in &transfers {
        let limit = match limits.entry(transfer.from_chain) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(state.inbox_rate_limit(transfer.from_chain)?.clone())
            }
        };
        if limit.capacity_at(now) < transfer.amount {
            continue;
        }
        ensure_payable(state.config.mode, custody, supply, transfer.amount)?;
        limit.consume_or_delay(transfer.amount, now);
        match state.config.mode {
            Mode::Locking => custody -= transfer.amount,
            Mode::Burning => supply += transfer.amount,
        }
    }

    transfers
        .into_iter()
        .map(|transfer| admit(state, transfer, now))
        .collect()
}

fn admit(
    state: &mut NttState,
    transfer: ValidatedTransfer,
    now: UnixTimestamp,
) -> Result<RedeemOutcome> {
    let ValidatedTransfer {
        from_chain,
        message,
        amount,
    } = transfer;

    let mut item = InboxItem::new(from_chain, message, amount);
    let key = item.key();

    match state
        .inbox_rate_limit_mut(from_chain)?
        .consume_or_delay(amount, now)
    {
        RateLimitResult::Consumed(now) => {
            // When receiving a transfer, we refill the outbound rate limit
            // by the same amount (we call this "backflow")
            state.outbox_rate_limit.refill(amount, now);
            item.release_after(now)?;
            state.inbox.insert(key, item);
            Ok(RedeemOutcome::Released(release_inbound(state, key, now)?))
        }
        RateLimitResult::Delayed(release_after) => {
            item.release_after(release_after)?;
            let queued = InboundQueuedTransfer {
                message: item.message.clone(),
                release_after,
                recipient: item.recipient_address,
                amount: item.message.payload.trimmed_amount,
            };
            state.inbox.insert(key, item);
            Ok(RedeemOutcome::Queued(queued))
        }
    }
}
