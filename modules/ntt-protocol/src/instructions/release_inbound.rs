use ntt_messages::{chain_id::ChainId, universal_address::UniversalAddress};

use crate::{
    clock::UnixTimestamp,
    config::Mode,
    error::{NttError, Result},
    queue::inbox::{InboxKey, ReleaseStatus},
    state::NttState,
};

/// A transfer paid out to its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasedTransfer {
    pub from_chain: ChainId,
    pub id: [u8; 32],
    pub recipient: UniversalAddress,
    /// In local token units.
    pub amount: u64,
}

/// Pays out an approved inbox item: unlocks from custody in locking mode,
/// mints in burning mode.
pub fn release_inbound(
    state: &mut NttState,
    key: InboxKey,
    now: UnixTimestamp,
) -> Result<ReleasedTransfer> {
    state.ensure_not_paused()?;

    let item = state
        .inbox
        .get(&key)
        .ok_or(NttError::QueuedTransferNotFound)?;
    match item.release_status {
        ReleaseStatus::NotApproved => return Err(NttError::TransferNotApproved),
        ReleaseStatus::ReleaseAfter(release_after) if release_after > now => {
            return Err(NttError::ReleaseTimestampNotReached { release_after, now })
        }
        ReleaseStatus::ReleaseAfter(_) => {}
        ReleaseStatus::Released => {
            return Err(NttError::AlreadyRedeemed {
                chain: key.0,
                id: key.1,
            })
        }
    }
    let recipient = item.recipient_address;
    let amount = item.amount;

    match state.config.mode {
        Mode::Locking => state.ledger.unlock(recipient, amount)?,
        Mode::Burning => state.ledger.mint(recipient, amount)?,
    }

    let item = state
        .inbox
        .get_mut(&key)
        .ok_or(NttError::QueuedTransferNotFound)?;
    item.try_release(now)?;

    Ok(ReleasedTransfer {
        from_chain: key.0,
        id: key.1,
        recipient,
        amount,
    })
}
