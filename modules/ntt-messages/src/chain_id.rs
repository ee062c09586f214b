use std::{fmt, io};

use wormhole_io::{Readable, Writeable};

/// Wormhole chain identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ChainId {
    pub id: u16,
}

impl ChainId {
    pub const SOLANA: ChainId = ChainId { id: 1 };
    pub const ETHEREUM: ChainId = ChainId { id: 2 };
    pub const FANTOM: ChainId = ChainId { id: 10 };
    pub const CELO: ChainId = ChainId { id: 14 };
    pub const SUI: ChainId = ChainId { id: 21 };
    pub const APTOS: ChainId = ChainId { id: 22 };
    pub const SEPOLIA: ChainId = ChainId { id: 10002 };
    pub const ARBITRUM_SEPOLIA: ChainId = ChainId { id: 10003 };
    pub const BASE_SEPOLIA: ChainId = ChainId { id: 10004 };
    pub const OPTIMISM_SEPOLIA: ChainId = ChainId { id: 10005 };

    pub const fn new(id: u16) -> Self {
        Self { id }
    }
}

impl From<u16> for ChainId {
    fn from(id: u16) -> Self {
        Self { id }
    }
}

impl From<ChainId> for u16 {
    fn from(chain: ChainId) -> Self {
        chain.id
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Readable for ChainId {
    const SIZE: Option<usize> = Some(2);

    fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized,
        R: io::Read,
    {
        let id = Readable::read(reader)?;

        Ok(Self { id })
    }
}

impl Writeable for ChainId {
    fn written_size(&self) -> usize {
        2
    }

    fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        let ChainId { id } = self;
        id.write(writer)
    }
}
