//! Chain-independent 32-byte addresses.
//!
//! Native addresses shorter than 32 bytes (20-byte EVM addresses, for
//! instance) are left-padded with zeroes. Mapping back to a native address
//! is the concern of each chain adapter.

use std::{fmt, io, str::FromStr};

use thiserror::Error;
use wormhole_io::{Readable, Writeable};

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniversalAddress([u8; 32]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
    #[error("address is {0} bytes, longer than 32")]
    TooLong(usize),
    #[error("address is empty")]
    Empty,
}

impl UniversalAddress {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Left-pads a native address of at most 32 bytes.
    pub fn from_native(native: &[u8]) -> Result<Self, AddressError> {
        if native.len() > Self::LEN {
            return Err(AddressError::TooLong(native.len()));
        }
        let mut bytes = [0u8; 32];
        bytes[Self::LEN - native.len()..].copy_from_slice(native);
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for UniversalAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<UniversalAddress> for [u8; 32] {
    fn from(address: UniversalAddress) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for UniversalAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for UniversalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for UniversalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniversalAddress({self})")
    }
}

impl FromStr for UniversalAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        // odd-length hex is a valid native address with its leading zero dropped
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let native = hex::decode(padded).map_err(|err| AddressError::InvalidHex(err.to_string()))?;
        Self::from_native(&native)
    }
}

impl Readable for UniversalAddress {
    const SIZE: Option<usize> = Some(32);

    fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized,
        R: io::Read,
    {
        let bytes: [u8; 32] = Readable::read(reader)?;
        Ok(Self(bytes))
    }
}

impl Writeable for UniversalAddress {
    fn written_size(&self) -> usize {
        Self::LEN
    }

    fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        self.0.write(writer)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UniversalAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UniversalAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
