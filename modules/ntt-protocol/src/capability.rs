//! Optional adapter capabilities.
//!
//! Not every chain adapter implements every operation. An adapter advertises
//! what it supports through [`CapabilitySet`], and an operation it lacks
//! returns [`NttError::CapabilityUnsupported`] instead of failing in some
//! other way.

use std::fmt;

use bitflags::bitflags;

use crate::error::NttError;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u16 {
        /// Batch transfer of non-fungible tokens
        const NFT_TRANSFER = 1 << 0;
        /// Delivery of the message by a relayer
        const AUTOMATIC_RELAY = 1 << 1;
        /// Quoting the relayer fee up front
        const DELIVERY_QUOTE = 1 << 2;
        /// Inbound and outbound capacity queries
        const CAPACITY_QUERY = 1 << 3;
        const INBOUND_QUEUE = 1 << 4;
        const OUTBOUND_QUEUE = 1 << 5;
        /// `get_is_approved` and `get_is_executed`
        const ATTESTATION_STATUS = 1 << 6;
        /// Version, custody address and token decimals
        const METADATA = 1 << 7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    NftTransfer,
    AutomaticRelay,
    DeliveryQuote,
    CapacityQuery,
    InboundQueue,
    OutboundQueue,
    AttestationStatus,
    Metadata,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::NftTransfer,
        Capability::AutomaticRelay,
        Capability::DeliveryQuote,
        Capability::CapacityQuery,
        Capability::InboundQueue,
        Capability::OutboundQueue,
        Capability::AttestationStatus,
        Capability::Metadata,
    ];

    pub const fn flag(self) -> CapabilitySet {
        match self {
            Capability::NftTransfer => CapabilitySet::NFT_TRANSFER,
            Capability::AutomaticRelay => CapabilitySet::AUTOMATIC_RELAY,
            Capability::DeliveryQuote => CapabilitySet::DELIVERY_QUOTE,
            Capability::CapacityQuery => CapabilitySet::CAPACITY_QUERY,
            Capability::InboundQueue => CapabilitySet::INBOUND_QUEUE,
            Capability::OutboundQueue => CapabilitySet::OUTBOUND_QUEUE,
            Capability::AttestationStatus => CapabilitySet::ATTESTATION_STATUS,
            Capability::Metadata => CapabilitySet::METADATA,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::NftTransfer => "nft transfer",
            Capability::AutomaticRelay => "automatic relay",
            Capability::DeliveryQuote => "delivery quote",
            Capability::CapacityQuery => "capacity query",
            Capability::InboundQueue => "inbound queue",
            Capability::OutboundQueue => "outbound queue",
            Capability::AttestationStatus => "attestation status",
            Capability::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

impl CapabilitySet {
    pub fn supports(&self, capability: Capability) -> bool {
        self.contains(capability.flag())
    }

    pub fn require(&self, capability: Capability) -> Result<(), NttError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(NttError::CapabilityUnsupported(capability))
        }
    }

    pub fn iter_capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(move |capability| self.supports(*capability))
    }
}
