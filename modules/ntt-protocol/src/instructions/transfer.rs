use ntt_messages::{
    transceivers::wormhole::WormholeTransceiverPayload, trimmed_amount::TrimmedAmount,
    universal_address::UniversalAddress,
};

use crate::{
    clock::UnixTimestamp,
    config::Mode,
    error::{NttError, Result},
    ntt::ChainAddress,
    queue::{outbox::OutboxItem, rate_limit::RateLimitResult},
    state::NttState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferArgs {
    pub sender: UniversalAddress,
    /// In local token units.
    pub amount: u64,
    pub recipient: ChainAddress,
    pub should_queue: bool,
    pub relayer_hint: Option<WormholeTransceiverPayload>,
}

/// Takes the sender's funds and records the transfer in the outbox.
///
/// Only the amount that survives trimming is taken, so dust stays with the
/// sender. Nothing is mutated unless the whole transfer is admitted.
pub fn transfer(state: &mut NttState, args: TransferArgs, now: UnixTimestamp) -> Result<OutboxItem> {
    state.ensure_not_paused()?;

    let TransferArgs {
        sender,
        amount,
        recipient,
        should_queue,
        relayer_hint,
    } = args;

    if amount == 0 {
        return Err(NttError::ZeroAmount);
    }

    let peer_decimals = state.peer(recipient.chain)?.token_decimals;
    // backflow target, created together with the peer
    state.inbox_rate_limit(recipient.chain)?;

    let available = state.ledger.balance_of(&sender);
    if available < amount {
        return Err(NttError::InsufficientFunds {
            required: amount,
            available,
        });
    }

    let (trimmed_amount, amount) =
        TrimmedAmount::remove_dust(amount, state.config.token_decimals, peer_decimals)?;
    if trimmed_amount.amount() == 0 {
        return Err(NttError::ZeroAmount);
    }

    let capacity = state.outbox_rate_limit.capacity_at(now);
    if capacity < amount && !should_queue {
        return Err(NttError::TransferExceedsRateLimit { amount, capacity });
    }

    match state.config.mode {
        Mode::Locking => state.ledger.lock(sender, amount)?,
        Mode::Burning => state.ledger.burn(sender, amount)?,
    }

    // consume the rate limit, or delay the transfer if it's outside the limit
    let release_timestamp = match state.outbox_rate_limit.consume_or_delay(amount, now) {
        RateLimitResult::Consumed(now) => {
            // When sending a transfer, we refill the inbound rate limit for
            // that chain the same amount (we call this "backflow")
            state
                .inbox_rate_limit_mut(recipient.chain)?
                .refill(amount, now);
            now
        }
        RateLimitResult::Delayed(release_timestamp) => release_timestamp,
    };

    let sequence = state.next_sequence();
    let item = OutboxItem {
        sequence,
        amount: trimmed_amount,
        sender,
        recipient,
        release_timestamp,
        relayer_hint,
        released: false,
    };
    state.outbox.insert(sequence, item.clone());

    Ok(item)
}
