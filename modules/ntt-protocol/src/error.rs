use ntt_messages::{
    chain_id::ChainId,
    errors::{LayoutError, ScalingError},
    universal_address::UniversalAddress,
};
use thiserror::Error;

use crate::{capability::Capability, clock::UnixTimestamp, config::Network};

#[derive(Debug, Error)]
pub enum NttError {
    #[error("malformed layout: {0}")]
    MalformedLayout(LayoutError),
    #[error("no configured transceiver prefix matches {found:02x?}")]
    UnknownPrefix { found: [u8; 4] },
    #[error("no peer configured for chain {0}")]
    UnknownPeer(ChainId),
    #[error("peer mismatch on chain {chain}: expected {expected}, found {found}")]
    PeerMismatch {
        chain: ChainId,
        expected: UniversalAddress,
        found: UniversalAddress,
    },
    #[error("message is addressed to manager {found}, not {expected}")]
    InvalidRecipientManager {
        expected: UniversalAddress,
        found: UniversalAddress,
    },
    #[error("invalid chain id: expected {expected}, found {found}")]
    InvalidChainId { expected: ChainId, found: ChainId },
    #[error("chain {0} can't be its own peer")]
    InvalidPeerChain(ChainId),
    #[error("message 0x{} from chain {chain} was already redeemed", hex::encode(.id))]
    AlreadyRedeemed { chain: ChainId, id: [u8; 32] },
    #[error("outbound transfer {sequence} was already sent")]
    MessageAlreadySent { sequence: u64 },
    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },
    #[error("capability not supported by this adapter: {0}")]
    CapabilityUnsupported(Capability),
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
    #[error("network mismatch: configured for {configured}, asked for {requested}")]
    NetworkMismatch {
        configured: Network,
        requested: Network,
    },
    #[error("release timestamp {release_after} not reached (now {now})")]
    ReleaseTimestampNotReached {
        release_after: UnixTimestamp,
        now: UnixTimestamp,
    },
    #[error("transfer of {amount} exceeds the current capacity {capacity}")]
    TransferExceedsRateLimit { amount: u64, capacity: u64 },
    #[error("queued transfer not found")]
    QueuedTransferNotFound,
    #[error("transfer has not been approved for release")]
    TransferNotApproved,
    #[error("transfer amount is zero after trimming")]
    ZeroAmount,
    #[error("paused")]
    Paused,
    #[error("no attestations supplied")]
    NoAttestations,
    #[error("arithmetic overflow")]
    Overflow,
    #[error(transparent)]
    Scaling(#[from] ScalingError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<LayoutError> for NttError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::UnknownPrefix { found } => NttError::UnknownPrefix { found },
            other => NttError::MalformedLayout(other),
        }
    }
}

pub type Result<T, E = NttError> = std::result::Result<T, E>;
