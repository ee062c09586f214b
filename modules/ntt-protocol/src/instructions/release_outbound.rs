use ntt_messages::{
    ntt::NativeTokenTransfer, ntt_manager::NttManagerMessage,
    transceivers::wormhole::WormholeTransceiverMessage,
};

use crate::{
    clock::UnixTimestamp,
    error::{NttError, Result},
    state::{message_id, NttState},
};

/// What the local Wormhole transceiver publishes for one transfer.
pub type OutboundMessage = WormholeTransceiverMessage<NttManagerMessage<NativeTokenTransfer>>;

/// Marks outbox item `sequence` as sent and builds its message.
///
/// Fails while the release timestamp is in the future, and on every call
/// after the first successful one.
pub fn release_outbound(
    state: &mut NttState,
    sequence: u64,
    now: UnixTimestamp,
) -> Result<OutboundMessage> {
    state.ensure_not_paused()?;

    let recipient_chain = state
        .outbox
        .get(&sequence)
        .ok_or(NttError::QueuedTransferNotFound)?
        .recipient
        .chain;
    let recipient_ntt_manager = state.peer(recipient_chain)?.address;

    let item = state
        .outbox
        .get_mut(&sequence)
        .ok_or(NttError::QueuedTransferNotFound)?;
    item.release(now)?;

    let message = NttManagerMessage {
        id: message_id(sequence),
        sender: item.sender,
        payload: NativeTokenTransfer {
            trimmed_amount: item.amount,
            source_token: state.config.token,
            recipient_address: item.recipient.address,
            recipient_chain: item.recipient.chain,
        },
    };

    Ok(OutboundMessage::new(
        state.config.manager,
        recipient_ntt_manager,
        message,
        item.relayer_hint,
    ))
}
