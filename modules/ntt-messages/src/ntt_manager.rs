use crate::{
    errors::LayoutError,
    layout::{self, Payload},
    universal_address::UniversalAddress,
};

/// The message one NTT manager sends to its peer.
///
/// `id` is the replay-protection token. Its uniqueness is enforced by the
/// receiving manager, not by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NttManagerMessage<P = Vec<u8>> {
    pub id: [u8; 32],
    pub sender: UniversalAddress,
    pub payload: P,
}

impl<P: Payload> NttManagerMessage<P> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, LayoutError> {
        self.to_payload_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LayoutError> {
        Self::read_payload(bytes)
    }
}

impl NttManagerMessage<Vec<u8>> {
    /// Interprets the raw payload as `P`.
    pub fn parse_payload<P: Payload>(self) -> Result<NttManagerMessage<P>, LayoutError> {
        let NttManagerMessage {
            id,
            sender,
            payload,
        } = self;
        Ok(NttManagerMessage {
            id,
            sender,
            payload: P::read_payload(&payload)?,
        })
    }
}

impl<P: Payload> Payload for NttManagerMessage<P> {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        let NttManagerMessage {
            id,
            sender,
            payload,
        } = self;

        layout::write(out, id)?;
        layout::write(out, sender)?;
        layout::write_prefixed_payload(out, payload, 2)
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = span;
        let id = layout::read_fixed(&mut reader)?;
        let sender = layout::read(&mut reader)?;
        let payload = layout::read_prefixed_payload(&mut reader, 2)?;
        layout::expect_end(reader, "NttManagerMessage")?;

        Ok(Self {
            id,
            sender,
            payload,
        })
    }
}
