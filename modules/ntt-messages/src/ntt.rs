use std::io;

use wormhole_io::{Readable, Writeable};

use crate::{
    chain_id::ChainId,
    errors::LayoutError,
    layout::{self, Payload},
    trimmed_amount::TrimmedAmount,
    universal_address::UniversalAddress,
};

/// The payload of a fungible token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTokenTransfer {
    pub trimmed_amount: TrimmedAmount,
    pub source_token: UniversalAddress,
    pub recipient_address: UniversalAddress,
    pub recipient_chain: ChainId,
}

impl NativeTokenTransfer {
    pub const PREFIX: [u8; 4] = [0x99, 0x4E, 0x54, 0x54];

    pub const SIZE: usize = 4 + TrimmedAmount::SIZE + 32 + 32 + 2;
}

impl Readable for NativeTokenTransfer {
    const SIZE: Option<usize> = Some(NativeTokenTransfer::SIZE);

    fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized,
        R: io::Read,
    {
        let prefix: [u8; 4] = Readable::read(reader)?;
        if prefix != Self::PREFIX {
            return Err(LayoutError::PrefixMismatch {
                frame: "NativeTokenTransfer",
                expected: Self::PREFIX,
                found: prefix,
            }
            .into_io());
        }

        let trimmed_amount = Readable::read(reader)?;
        let source_token = Readable::read(reader)?;
        let recipient_address = Readable::read(reader)?;
        let recipient_chain = Readable::read(reader)?;

        Ok(Self {
            trimmed_amount,
            source_token,
            recipient_address,
            recipient_chain,
        })
    }
}

impl Writeable for NativeTokenTransfer {
    fn written_size(&self) -> usize {
        Self::SIZE
    }

    fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        let NativeTokenTransfer {
            trimmed_amount,
            source_token,
            recipient_address,
            recipient_chain,
        } = self;

        Self::PREFIX.write(writer)?;
        trimmed_amount.write(writer)?;
        source_token.write(writer)?;
        recipient_address.write(writer)?;
        recipient_chain.write(writer)?;

        Ok(())
    }
}

impl Payload for NativeTokenTransfer {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        layout::write(out, self)
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        layout::read_exact(span, "NativeTokenTransfer")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> NativeTokenTransfer {
        let mut source_token = [0u8; 32];
        source_token[..4].copy_from_slice(&[0xBE, 0xEF, 0xFA, 0xCE]);
        let mut recipient_address = [0u8; 32];
        recipient_address[..4].copy_from_slice(&[0xFE, 0xEB, 0xCA, 0xFE]);
        NativeTokenTransfer {
            trimmed_amount: TrimmedAmount::new(1234567, 7),
            source_token: source_token.into(),
            recipient_address: recipient_address.into(),
            recipient_chain: ChainId { id: 17 },
        }
    }

    const SAMPLE_HEX: &str = concat!(
        "994e5454",
        "07",
        "000000000012d687",
        "beefface00000000000000000000000000000000000000000000000000000000",
        "feebcafe00000000000000000000000000000000000000000000000000000000",
        "0011",
    );

    #[test]
    fn test_deserialize_native_token_transfer() {
        let data = hex::decode(SAMPLE_HEX).unwrap();
        assert_eq!(data.len(), NativeTokenTransfer::SIZE);

        let transfer = NativeTokenTransfer::read_payload(&data).unwrap();
        assert_eq!(transfer, sample());
        assert_eq!(transfer.to_payload_bytes().unwrap(), data);
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        let mut data = hex::decode(SAMPLE_HEX).unwrap();
        data[3] = 0x55;
        assert_eq!(
            NativeTokenTransfer::read_payload(&data),
            Err(LayoutError::PrefixMismatch {
                frame: "NativeTokenTransfer",
                expected: NativeTokenTransfer::PREFIX,
                found: [0x99, 0x4E, 0x54, 0x55],
            })
        );
    }

    #[test]
    fn test_rejects_truncated_and_padded() {
        let data = hex::decode(SAMPLE_HEX).unwrap();
        assert_eq!(
            NativeTokenTransfer::read_payload(&data[..data.len() - 1]),
            Err(LayoutError::Truncated)
        );

        let mut padded = data.clone();
        padded.push(0);
        assert_eq!(
            NativeTokenTransfer::read_payload(&padded),
            Err(LayoutError::TrailingBytes {
                frame: "NativeTokenTransfer",
                count: 1
            })
        );
    }
}
