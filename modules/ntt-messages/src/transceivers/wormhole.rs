use std::io;

use wormhole_io::{Readable, Writeable};

use crate::{
    chain_id::ChainId,
    errors::LayoutError,
    layout::{self, Payload},
    transceiver::{Transceiver, TransceiverMessage},
    universal_address::UniversalAddress,
};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct WormholeTransceiver {}

impl Transceiver for WormholeTransceiver {
    const PREFIX: [u8; 4] = [0x99, 0x45, 0xFF, 0x10];
}

impl WormholeTransceiver {
    pub const PEER_INFO_PREFIX: [u8; 4] = [0x18, 0xfc, 0x67, 0xc2];
}

/// A transceiver message with the Wormhole relayer hint as its transceiver
/// payload.
pub type WormholeTransceiverMessage<MP = Vec<u8>> =
    TransceiverMessage<MP, Option<WormholeTransceiverPayload>>;

// * Relayer hint

/// Present only when the sender asked for relaying. An empty transceiver
/// payload decodes as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WormholeTransceiverPayload {
    pub for_specialized_relayer: bool,
}

impl WormholeTransceiverPayload {
    /// Implied by a non-empty payload; never written.
    pub const VERSION: u16 = 1;
}

impl Payload for WormholeTransceiverPayload {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        layout::write_uint(out, u64::from(self.for_specialized_relayer), 1)
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = span;
        let flag = layout::read_uint(&mut reader, 1)?;
        layout::expect_end(reader, "WormholeTransceiverPayload")?;
        Ok(Self {
            for_specialized_relayer: flag > 0,
        })
    }
}

impl Payload for Option<WormholeTransceiverPayload> {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        match self {
            Some(payload) => payload.write_payload(out),
            None => Ok(()),
        }
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        if span.is_empty() {
            Ok(None)
        } else {
            WormholeTransceiverPayload::read_payload(span).map(Some)
        }
    }
}

// * Transceiver registration

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormholeTransceiverRegistration {
    pub chain_id: ChainId,
    pub transceiver_address: UniversalAddress,
}

impl Readable for WormholeTransceiverRegistration {
    const SIZE: Option<usize> = Some(4 + 2 + 32);

    fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized,
        R: io::Read,
    {
        let prefix = <[u8; 4]>::read(reader)?;
        if prefix != WormholeTransceiver::PEER_INFO_PREFIX {
            return Err(LayoutError::PrefixMismatch {
                frame: "WormholeTransceiverRegistration",
                expected: WormholeTransceiver::PEER_INFO_PREFIX,
                found: prefix,
            }
            .into_io());
        }

        let chain_id = ChainId::read(reader)?;
        let transceiver_address = UniversalAddress::read(reader)?;

        Ok(WormholeTransceiverRegistration {
            chain_id,
            transceiver_address,
        })
    }
}

impl Writeable for WormholeTransceiverRegistration {
    fn written_size(&self) -> usize {
        4 + 2 + 32
    }

    fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        WormholeTransceiver::PEER_INFO_PREFIX.write(writer)?;
        self.chain_id.write(writer)?;
        self.transceiver_address.write(writer)
    }
}

impl Payload for WormholeTransceiverRegistration {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        layout::write(out, self)
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        layout::read_exact(span, "WormholeTransceiverRegistration")
    }
}
