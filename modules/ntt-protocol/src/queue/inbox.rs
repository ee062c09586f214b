use ntt_messages::{
    chain_id::ChainId, ntt::NativeTokenTransfer, ntt_manager::NttManagerMessage,
    universal_address::UniversalAddress,
};

use crate::{
    clock::UnixTimestamp,
    error::{NttError, Result},
    ntt::InboundQueuedTransfer,
};

/// Inbox entries are unique per source chain and message id.
pub type InboxKey = (ChainId, [u8; 32]);

/// A received transfer. Its existence marks the message id as consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxItem {
    pub from_chain: ChainId,
    pub message: NttManagerMessage<NativeTokenTransfer>,
    /// Untrimmed to local decimals.
    pub amount: u64,
    pub recipient_address: UniversalAddress,
    pub release_status: ReleaseStatus,
}

/// The status of an InboxItem. This determines whether the tokens are minted/unlocked to the recipient. As
/// such, this must be used as a state machine that moves forward in a linear manner. A state
/// should never "move backward" to a previous state (e.g. should never move from `Released` to
/// `ReleaseAfter`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseStatus {
    NotApproved,
    ReleaseAfter(UnixTimestamp),
    Released,
}

impl InboxItem {
    pub fn new(
        from_chain: ChainId,
        message: NttManagerMessage<NativeTokenTransfer>,
        amount: u64,
    ) -> Self {
        let recipient_address = message.payload.recipient_address;
        Self {
            from_chain,
            message,
            amount,
            recipient_address,
            release_status: ReleaseStatus::NotApproved,
        }
    }

    pub fn key(&self) -> InboxKey {
        (self.from_chain, self.message.id)
    }

    /// Attempt to release the transfer.
    /// Returns true if the transfer was released, false if it was not yet time to release it.
    pub fn try_release(&mut self, now: UnixTimestamp) -> Result<bool> {
        match self.release_status {
            ReleaseStatus::NotApproved => Ok(false),
            ReleaseStatus::ReleaseAfter(release_timestamp) => {
                if release_timestamp > now {
                    return Ok(false);
                }
                self.release_status = ReleaseStatus::Released;
                Ok(true)
            }
            ReleaseStatus::Released => Err(NttError::AlreadyRedeemed {
                chain: self.from_chain,
                id: self.message.id,
            }),
        }
    }

    pub fn release_after(&mut self, release_timestamp: UnixTimestamp) -> Result<()> {
        if self.release_status != ReleaseStatus::NotApproved {
            return Err(NttError::AlreadyRedeemed {
                chain: self.from_chain,
                id: self.message.id,
            });
        };
        self.release_status = ReleaseStatus::ReleaseAfter(release_timestamp);
        Ok(())
    }

    /// The queue view of this item, while it is waiting for release.
    pub fn queued(&self) -> Option<InboundQueuedTransfer> {
        match self.release_status {
            ReleaseStatus::ReleaseAfter(release_after) => Some(InboundQueuedTransfer {
                message: self.message.clone(),
                release_after,
                recipient: self.recipient_address,
                amount: self.message.payload.trimmed_amount,
            }),
            ReleaseStatus::NotApproved | ReleaseStatus::Released => None,
        }
    }
}
