use ntt_messages::{chain_id::ChainId, universal_address::UniversalAddress};
use serde::{Deserialize, Serialize};

/// One step of an operation, to be signed and submitted by the caller.
///
/// Operations return these in submission order. A descriptor marked
/// `parallelizable` does not depend on the one before it and may be submitted
/// without waiting for it to land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub chain: ChainId,
    pub description: String,
    pub parallelizable: bool,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn new(chain: ChainId, description: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            chain,
            description: description.into(),
            parallelizable: false,
            payload,
        }
    }

    pub fn parallelizable(mut self) -> Self {
        self.parallelizable = true;
        self
    }
}

/// An externally produced proof that `payload` was emitted by
/// `emitter_address` on `emitter_chain`. Treated as opaque and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub emitter_chain: ChainId,
    pub emitter_address: UniversalAddress,
    pub sequence: u64,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
