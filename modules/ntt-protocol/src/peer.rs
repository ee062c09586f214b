use ntt_messages::{
    chain_id::ChainId,
    errors::LayoutError,
    layout,
    universal_address::UniversalAddress,
};
use serde::{Deserialize, Serialize};

/// A peer manager on another chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NttManagerPeer {
    pub address: UniversalAddress,
    pub token_decimals: u8,
}

/// Everything `set_peer` configures for one counterpart chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    pub chain: ChainId,
    pub manager_address: UniversalAddress,
    pub token_decimals: u8,
    pub inbound_limit: u64,
}

impl PeerConfig {
    /// `chain[2] manager[32] decimals[1] inbound_limit[8]`
    pub fn to_bytes(&self) -> Result<Vec<u8>, LayoutError> {
        let mut out = Vec::with_capacity(2 + 32 + 1 + 8);
        layout::write(&mut out, &self.chain)?;
        layout::write(&mut out, &self.manager_address)?;
        layout::write_uint(&mut out, u64::from(self.token_decimals), 1)?;
        layout::write_uint(&mut out, self.inbound_limit, 8)?;
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_peer_config_bytes() {
        let peer = PeerConfig {
            chain: ChainId::SUI,
            manager_address: UniversalAddress::new([9; 32]),
            token_decimals: 6,
            inbound_limit: 0x0102,
        };
        let bytes = peer.to_bytes().unwrap();
        assert_eq!(bytes.len(), 43);
        assert_eq!(&bytes[..2], &[0x00, 0x15]);
        assert_eq!(bytes[34], 6);
        assert_eq!(&bytes[41..], &[0x01, 0x02]);
    }
}
