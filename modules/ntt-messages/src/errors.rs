use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ScalingError {
    #[error("Overflow: scaling factor exponent exceeds the max value of u128")]
    OverflowExponent,
    #[error("Overflow: scaled amount exceeds the max value of u128")]
    OverflowScaledAmount,
    #[error("Overflow: trimmed amount exceeds the max value of u64")]
    OverflowTrimmedAmount,
}

/// Structural failures while encoding or decoding a frame.
///
/// Every variant except [`LayoutError::UnknownPrefix`] describes a malformed
/// layout: the bytes cannot be the frame they claim to be.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LayoutError {
    #[error("buffer ended before the declared field width")]
    Truncated,
    #[error("declared length {declared} exceeds the {remaining} remaining bytes")]
    LengthOverrun { declared: usize, remaining: usize },
    #[error("invalid prefix for {frame}: expected {expected:02x?}, found {found:02x?}")]
    PrefixMismatch {
        frame: &'static str,
        expected: [u8; 4],
        found: [u8; 4],
    },
    #[error("{count} trailing bytes after {frame}")]
    TrailingBytes { frame: &'static str, count: usize },
    #[error("length {len} does not fit a {width}-byte length prefix")]
    LengthOverflow { len: usize, width: usize },
    #[error("value {value} does not fit in {width} bytes")]
    ValueOverflow { value: u64, width: usize },
    #[error("unsupported field width {0}")]
    InvalidWidth(usize),
    #[error("fixed field expected {expected} bytes, got {actual}")]
    FixedLengthMismatch { expected: usize, actual: usize },
    #[error("malformed layout: {0}")]
    Malformed(String),
    #[error("no configured transceiver prefix matches {found:02x?}")]
    UnknownPrefix { found: [u8; 4] },
}

impl LayoutError {
    pub fn is_malformed(&self) -> bool {
        !matches!(self, LayoutError::UnknownPrefix { .. })
    }

    /// Wraps `self` so it can be returned from a [`wormhole_io::Readable`]
    /// impl and recovered intact by `From<io::Error>`.
    pub fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, self)
    }
}

impl From<io::Error> for LayoutError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            return LayoutError::Truncated;
        }
        let description = err.to_string();
        match err.into_inner() {
            Some(inner) => match inner.downcast::<LayoutError>() {
                Ok(layout) => *layout,
                Err(other) => LayoutError::Malformed(other.to_string()),
            },
            None => LayoutError::Malformed(description),
        }
    }
}
