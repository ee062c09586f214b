//! The operations every chain adapter provides.
//!
//! The four core operations (`transfer`, `redeem`, `set_peer`,
//! `set_wormhole_transceiver_peer`) are required. Everything else is an
//! optional capability: the default implementations report
//! [`NttError::CapabilityUnsupported`], and adapters override the ones they
//! list in [`Ntt::capabilities`].

use async_trait::async_trait;
use ntt_messages::{
    chain_id::ChainId, ntt::NativeTokenTransfer, ntt_manager::NttManagerMessage,
    trimmed_amount::TrimmedAmount, universal_address::UniversalAddress,
};
use serde::{Deserialize, Serialize};

use crate::{
    capability::{Capability, CapabilitySet},
    clock::UnixTimestamp,
    error::{NttError, Result},
    transaction::{Attestation, UnsignedTransaction},
};

/// An address qualified by the chain it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAddress {
    pub chain: ChainId,
    pub address: UniversalAddress,
}

impl ChainAddress {
    pub const fn new(chain: ChainId, address: UniversalAddress) -> Self {
        Self { chain, address }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Accept a delayed transfer when the outbound limit is exhausted.
    #[serde(default)]
    pub queue: bool,
    /// Ask a relayer to deliver the message on the destination chain.
    #[serde(default)]
    pub automatic: bool,
    /// Native gas to drop off to the recipient on the destination chain.
    #[serde(default)]
    pub gas_dropoff: u64,
}

/// An inbound transfer that exceeded the inbound capacity of its source
/// chain and waits for `release_after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundQueuedTransfer {
    pub message: NttManagerMessage<NativeTokenTransfer>,
    pub release_after: UnixTimestamp,
    pub recipient: UniversalAddress,
    pub amount: TrimmedAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundQueuedTransfer {
    pub sequence: u64,
    pub release_after: UnixTimestamp,
    pub sender: UniversalAddress,
    pub recipient: ChainAddress,
    pub amount: TrimmedAmount,
}

fn unsupported<T>(capability: Capability) -> Result<T> {
    Err(NttError::CapabilityUnsupported(capability))
}

#[async_trait]
pub trait Ntt: Send + Sync {
    /// The chain this adapter operates on.
    fn chain(&self) -> ChainId;

    fn capabilities(&self) -> CapabilitySet;

    /// Takes `amount` (in local token units) from `sender` and produces the
    /// message bound for `destination`.
    async fn transfer(
        &self,
        sender: UniversalAddress,
        amount: u64,
        destination: ChainAddress,
        options: TransferOptions,
    ) -> Result<Vec<UnsignedTransaction>>;

    async fn redeem(&self, attestations: &[Attestation]) -> Result<Vec<UnsignedTransaction>>;

    /// Idempotent: repeating a call with the same arguments leaves the peer
    /// configuration unchanged.
    async fn set_peer(
        &self,
        peer: ChainAddress,
        token_decimals: u8,
        inbound_limit: u64,
    ) -> Result<Vec<UnsignedTransaction>>;

    async fn set_wormhole_transceiver_peer(
        &self,
        peer: ChainAddress,
    ) -> Result<Vec<UnsignedTransaction>>;

    /// Moves the NFTs `token_ids` to `destination`. Each id is encoded in
    /// `token_id_width` bytes on the wire.
    async fn transfer_nft(
        &self,
        _sender: UniversalAddress,
        _token_ids: &[u64],
        _token_id_width: u8,
        _destination: ChainAddress,
        _options: TransferOptions,
    ) -> Result<Vec<UnsignedTransaction>> {
        unsupported(Capability::NftTransfer)
    }

    async fn is_relaying_available(&self, _destination: ChainId) -> Result<bool> {
        Ok(self.capabilities().supports(Capability::AutomaticRelay))
    }

    async fn quote_delivery_price(
        &self,
        _destination: ChainId,
        _options: &TransferOptions,
    ) -> Result<u64> {
        unsupported(Capability::DeliveryQuote)
    }

    async fn get_version(&self) -> Result<String> {
        unsupported(Capability::Metadata)
    }

    async fn get_custody_address(&self) -> Result<UniversalAddress> {
        unsupported(Capability::Metadata)
    }

    async fn get_token_decimals(&self) -> Result<u8> {
        unsupported(Capability::Metadata)
    }

    async fn get_current_outbound_capacity(&self) -> Result<u64> {
        unsupported(Capability::CapacityQuery)
    }

    async fn get_current_inbound_capacity(&self, _from_chain: ChainId) -> Result<u64> {
        unsupported(Capability::CapacityQuery)
    }

    /// Whether the attestation was accepted by this chain's manager.
    async fn get_is_approved(&self, _attestation: &Attestation) -> Result<bool> {
        unsupported(Capability::AttestationStatus)
    }

    /// Whether the transfer in the attestation has been paid out.
    async fn get_is_executed(&self, _attestation: &Attestation) -> Result<bool> {
        unsupported(Capability::AttestationStatus)
    }

    async fn get_inbound_queued_transfer(
        &self,
        _from_chain: ChainId,
        _message: &NttManagerMessage<NativeTokenTransfer>,
    ) -> Result<Option<InboundQueuedTransfer>> {
        unsupported(Capability::InboundQueue)
    }

    async fn complete_inbound_queued_transfer(
        &self,
        _from_chain: ChainId,
        _message: &NttManagerMessage<NativeTokenTransfer>,
    ) -> Result<Vec<UnsignedTransaction>> {
        unsupported(Capability::InboundQueue)
    }

    async fn get_outbound_queued_transfer(
        &self,
        _sequence: u64,
    ) -> Result<Option<OutboundQueuedTransfer>> {
        unsupported(Capability::OutboundQueue)
    }

    async fn complete_outbound_queued_transfer(
        &self,
        _sequence: u64,
    ) -> Result<Vec<UnsignedTransaction>> {
        unsupported(Capability::OutboundQueue)
    }
}
