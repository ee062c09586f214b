use ntt_messages::{
    transceivers::wormhole::WormholeTransceiverPayload, trimmed_amount::TrimmedAmount,
    universal_address::UniversalAddress,
};

use crate::{
    clock::UnixTimestamp,
    error::{NttError, Result},
    ntt::{ChainAddress, OutboundQueuedTransfer},
};

/// An outbound transfer whose funds have already left the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxItem {
    pub sequence: u64,
    pub amount: TrimmedAmount,
    pub sender: UniversalAddress,
    pub recipient: ChainAddress,
    pub release_timestamp: UnixTimestamp,
    pub relayer_hint: Option<WormholeTransceiverPayload>,
    pub released: bool,
}

impl OutboxItem {
    pub fn release(&mut self, now: UnixTimestamp) -> Result<()> {
        if self.release_timestamp > now {
            return Err(NttError::ReleaseTimestampNotReached {
                release_after: self.release_timestamp,
                now,
            });
        }

        if self.released {
            return Err(NttError::MessageAlreadySent {
                sequence: self.sequence,
            });
        }

        self.released = true;

        Ok(())
    }

    pub fn queued(&self) -> Option<OutboundQueuedTransfer> {
        (!self.released).then(|| OutboundQueuedTransfer {
            sequence: self.sequence,
            release_after: self.release_timestamp,
            sender: self.sender,
            recipient: self.recipient,
            amount: self.amount,
        })
    }
}
