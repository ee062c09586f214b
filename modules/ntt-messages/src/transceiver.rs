use std::fmt;

use crate::{
    errors::LayoutError,
    layout::{self, Payload},
    universal_address::UniversalAddress,
};

/// A message delivery mechanism, identified on the wire by its prefix.
pub trait Transceiver {
    const PREFIX: [u8; 4];
}

/// A transceiver prefix known only at runtime, e.g. from configuration.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TransceiverPrefix(pub [u8; 4]);

impl TransceiverPrefix {
    pub const WORMHOLE: TransceiverPrefix =
        TransceiverPrefix(crate::transceivers::wormhole::WormholeTransceiver::PREFIX);

    pub const fn of<E: Transceiver>() -> Self {
        Self(E::PREFIX)
    }
}

impl fmt::Debug for TransceiverPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransceiverPrefix(0x{})", hex::encode(self.0))
    }
}

/// The outermost frame, produced by the sending transceiver.
///
/// The prefix is a wire-level tag: it is written on encode and checked on
/// decode but not kept in the value. `MP` and `TP` default to raw bytes so
/// the envelope can be split without understanding what it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiverMessage<MP = Vec<u8>, TP = Vec<u8>> {
    pub source_ntt_manager: UniversalAddress,
    pub recipient_ntt_manager: UniversalAddress,
    pub ntt_manager_payload: MP,
    pub transceiver_payload: TP,
}

impl<MP: Payload, TP: Payload> TransceiverMessage<MP, TP> {
    pub fn new(
        source_ntt_manager: UniversalAddress,
        recipient_ntt_manager: UniversalAddress,
        ntt_manager_payload: MP,
        transceiver_payload: TP,
    ) -> Self {
        Self {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload,
        }
    }

    pub fn encode(&self, prefix: TransceiverPrefix) -> Result<Vec<u8>, LayoutError> {
        let mut out = Vec::new();
        layout::write(&mut out, &prefix.0)?;
        self.write_body(&mut out)?;
        Ok(out)
    }

    pub fn encode_for<E: Transceiver>(&self) -> Result<Vec<u8>, LayoutError> {
        self.encode(TransceiverPrefix::of::<E>())
    }

    /// Decodes a message whose prefix is one of `prefixes`, tried in the
    /// order given. Returns the prefix that matched.
    pub fn decode(
        bytes: &[u8],
        prefixes: &[TransceiverPrefix],
    ) -> Result<(TransceiverPrefix, Self), LayoutError> {
        let mut reader = bytes;
        let found: [u8; 4] = layout::read_fixed(&mut reader)?;
        let prefix = prefixes
            .iter()
            .copied()
            .find(|prefix| prefix.0 == found)
            .ok_or(LayoutError::UnknownPrefix { found })?;
        let message = Self::read_body(reader)?;
        Ok((prefix, message))
    }

    pub fn decode_for<E: Transceiver>(bytes: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = bytes;
        layout::read_prefix(&mut reader, E::PREFIX, "TransceiverMessage")?;
        Self::read_body(reader)
    }

    fn write_body(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        let TransceiverMessage {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload,
        } = self;

        layout::write(out, source_ntt_manager)?;
        layout::write(out, recipient_ntt_manager)?;
        layout::write_prefixed_payload(out, ntt_manager_payload, 2)?;
        layout::write_prefixed_payload(out, transceiver_payload, 2)
    }

    fn read_body(mut reader: &[u8]) -> Result<Self, LayoutError> {
        let source_ntt_manager = layout::read(&mut reader)?;
        let recipient_ntt_manager = layout::read(&mut reader)?;
        let ntt_manager_payload = layout::read_prefixed_payload(&mut reader, 2)?;
        let transceiver_payload = layout::read_prefixed_payload(&mut reader, 2)?;
        layout::expect_end(reader, "TransceiverMessage")?;

        Ok(Self {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload,
        })
    }
}

impl<TP> TransceiverMessage<Vec<u8>, TP> {
    /// Second decoding phase for the manager payload.
    pub fn parse_manager_payload<MP: Payload>(
        self,
    ) -> Result<TransceiverMessage<MP, TP>, LayoutError> {
        let TransceiverMessage {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload,
        } = self;
        Ok(TransceiverMessage {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload: MP::read_payload(&ntt_manager_payload)?,
            transceiver_payload,
        })
    }
}

impl<MP> TransceiverMessage<MP, Vec<u8>> {
    pub fn parse_transceiver_payload<TP: Payload>(
        self,
    ) -> Result<TransceiverMessage<MP, TP>, LayoutError> {
        let TransceiverMessage {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload,
        } = self;
        Ok(TransceiverMessage {
            source_ntt_manager,
            recipient_ntt_manager,
            ntt_manager_payload,
            transceiver_payload: TP::read_payload(&transceiver_payload)?,
        })
    }
}

/// Per-transceiver options passed alongside a transfer. `index` selects the
/// transceiver in the manager's registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiverInstruction<P = Vec<u8>> {
    pub index: u8,
    pub payload: P,
}

impl<P: Payload> Payload for TransceiverInstruction<P> {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        layout::write(out, &self.index)?;
        layout::write_prefixed_payload(out, &self.payload, 1)
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = span;
        let index = layout::read(&mut reader)?;
        let payload = layout::read_prefixed_payload(&mut reader, 1)?;
        layout::expect_end(reader, "TransceiverInstruction")?;
        Ok(Self { index, payload })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        chain_id::ChainId, ntt::NativeTokenTransfer, ntt_manager::NttManagerMessage,
        transceivers::wormhole::WormholeTransceiver, trimmed_amount::TrimmedAmount,
    };

    fn padded(head: &[u8]) -> UniversalAddress {
        let mut bytes = [0u8; 32];
        bytes[..head.len()].copy_from_slice(head);
        bytes.into()
    }

    fn sample() -> TransceiverMessage<NttManagerMessage<NativeTokenTransfer>> {
        let mut id = [0u8; 32];
        id[..7].copy_from_slice(&[0x12, 0x84, 0x34, 0xBA, 0xFE, 0x23, 0x43]);
        id[24] = 0xCE;
        id[26] = 0xAA;

        TransceiverMessage::new(
            padded(&[0x04, 0x29, 0x42, 0xFA, 0xFA, 0xBE]),
            padded(&[0x04, 0x29, 0x42, 0xFA, 0xBA, 0xBE]),
            NttManagerMessage {
                id,
                sender: padded(&[0x46, 0x67, 0x92, 0x13, 0x41, 0x23, 0x43]),
                payload: NativeTokenTransfer {
                    trimmed_amount: TrimmedAmount::new(1234567, 7),
                    source_token: padded(&[0xBE, 0xEF, 0xFA, 0xCE]),
                    recipient_address: padded(&[0xFE, 0xEB, 0xCA, 0xFE]),
                    recipient_chain: ChainId { id: 17 },
                },
            },
            vec![],
        )
    }

    const SAMPLE_HEX: &str = concat!(
        "9945ff10",
        "042942fafabe0000000000000000000000000000000000000000000000000000",
        "042942fababe0000000000000000000000000000000000000000000000000000",
        "0091",
        "128434bafe23430000000000000000000000000000000000ce00aa0000000000",
        "4667921341234300000000000000000000000000000000000000000000000000",
        "004f",
        "994e5454",
        "07",
        "000000000012d687",
        "beefface00000000000000000000000000000000000000000000000000000000",
        "feebcafe00000000000000000000000000000000000000000000000000000000",
        "0011",
        "0000",
    );

    #[test]
    fn test_deserialize_transceiver_message() {
        let data = hex::decode(SAMPLE_HEX).unwrap();

        let message: TransceiverMessage<NttManagerMessage<NativeTokenTransfer>> =
            TransceiverMessage::decode_for::<WormholeTransceiver>(&data).unwrap();
        assert_eq!(message, sample());
        assert_eq!(message.encode_for::<WormholeTransceiver>().unwrap(), data);
    }

    #[test]
    fn test_outer_frame_splits_without_inner_layout() {
        let data = hex::decode(SAMPLE_HEX).unwrap();

        let raw: TransceiverMessage =
            TransceiverMessage::decode_for::<WormholeTransceiver>(&data).unwrap();
        assert_eq!(raw.ntt_manager_payload.len(), 0x91);
        assert!(raw.transceiver_payload.is_empty());

        let typed = raw
            .parse_manager_payload::<NttManagerMessage<NativeTokenTransfer>>()
            .unwrap();
        assert_eq!(typed, sample());
    }

    #[test]
    fn test_prefixes_tried_in_order() {
        let data = hex::decode(SAMPLE_HEX).unwrap();
        let other = TransceiverPrefix([0x01, 0x02, 0x03, 0x04]);

        let (prefix, _) =
            TransceiverMessage::<Vec<u8>>::decode(&data, &[other, TransceiverPrefix::WORMHOLE])
                .unwrap();
        assert_eq!(prefix, TransceiverPrefix::WORMHOLE);

        assert_eq!(
            TransceiverMessage::<Vec<u8>>::decode(&data, &[other]),
            Err(LayoutError::UnknownPrefix {
                found: WormholeTransceiver::PREFIX
            })
        );
        assert_eq!(
            TransceiverMessage::<Vec<u8>>::decode(&data[..3], &[other]),
            Err(LayoutError::Truncated)
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut data = hex::decode(SAMPLE_HEX).unwrap();
        data.push(0xFF);
        assert_eq!(
            TransceiverMessage::<Vec<u8>>::decode_for::<WormholeTransceiver>(&data),
            Err(LayoutError::TrailingBytes {
                frame: "TransceiverMessage",
                count: 1
            })
        );
    }

    #[test]
    fn test_transceiver_instruction() {
        let instruction = TransceiverInstruction {
            index: 0,
            payload: vec![0x01],
        };
        let bytes = instruction.to_payload_bytes().unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0x01]);
        assert_eq!(TransceiverInstruction::read_payload(&bytes).unwrap(), instruction);

        assert_eq!(
            TransceiverInstruction::<Vec<u8>>::read_payload(&[0x00, 0x02, 0x01]),
            Err(LayoutError::LengthOverrun {
                declared: 2,
                remaining: 1
            })
        );
    }
}
