//! Big-endian primitives that every frame in this crate is composed of.
//!
//! Readers are `&mut &[u8]` cursors: each successful read advances the slice
//! past the consumed bytes, so the remaining length is always known and a
//! length prefix can be checked against it before anything is copied.

use wormhole_io::{Readable, Writeable};

use crate::errors::LayoutError;

/// A value that can sit inside a length-prefixed slot of an enclosing frame.
///
/// Decoding is handed exactly the bytes the enclosing frame declared, and
/// must consume all of them. `Vec<u8>` implements this trait as the
/// uninterpreted form, so an outer frame can always be split without knowing
/// what it carries.
pub trait Payload: Sized {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError>;

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError>;

    fn to_payload_bytes(&self) -> Result<Vec<u8>, LayoutError> {
        let mut out = Vec::new();
        self.write_payload(&mut out)?;
        Ok(out)
    }
}

impl Payload for Vec<u8> {
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        out.extend_from_slice(self);
        Ok(())
    }

    fn read_payload(span: &[u8]) -> Result<Self, LayoutError> {
        Ok(span.to_vec())
    }
}

fn check_width(width: usize) -> Result<(), LayoutError> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(LayoutError::InvalidWidth(width))
    }
}

pub fn write_uint(out: &mut Vec<u8>, value: u64, width: usize) -> Result<(), LayoutError> {
    check_width(width)?;
    if width < 8 && value >> (8 * width) != 0 {
        return Err(LayoutError::ValueOverflow { value, width });
    }
    out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
    Ok(())
}

pub fn read_uint(reader: &mut &[u8], width: usize) -> Result<u64, LayoutError> {
    check_width(width)?;
    let bytes = take(reader, width)?;
    Ok(bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

pub fn write_fixed(out: &mut Vec<u8>, value: &[u8], length: usize) -> Result<(), LayoutError> {
    if value.len() != length {
        return Err(LayoutError::FixedLengthMismatch {
            expected: length,
            actual: value.len(),
        });
    }
    out.extend_from_slice(value);
    Ok(())
}

pub fn read_fixed<const N: usize>(reader: &mut &[u8]) -> Result<[u8; N], LayoutError> {
    read(reader)
}

/// Reads a magic prefix and fails unless it equals `expected`.
pub fn read_prefix(
    reader: &mut &[u8],
    expected: [u8; 4],
    frame: &'static str,
) -> Result<(), LayoutError> {
    let found: [u8; 4] = read_fixed(reader)?;
    if found != expected {
        return Err(LayoutError::PrefixMismatch {
            frame,
            expected,
            found,
        });
    }
    Ok(())
}

pub fn write_length_prefixed(
    out: &mut Vec<u8>,
    bytes: &[u8],
    width: usize,
) -> Result<(), LayoutError> {
    check_width(width)?;
    let len = u64::try_from(bytes.len())
        .map_err(|_| LayoutError::LengthOverflow { len: bytes.len(), width })?;
    write_uint(out, len, width).map_err(|_| LayoutError::LengthOverflow {
        len: bytes.len(),
        width,
    })?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Encodes `payload` into a length-prefixed slot.
pub fn write_prefixed_payload<P: Payload>(
    out: &mut Vec<u8>,
    payload: &P,
    width: usize,
) -> Result<(), LayoutError> {
    let bytes = payload.to_payload_bytes()?;
    write_length_prefixed(out, &bytes, width)
}

/// Splits a length-prefixed field off the front of `reader` without
/// interpreting it.
pub fn read_length_prefixed<'a>(
    reader: &mut &'a [u8],
    width: usize,
) -> Result<&'a [u8], LayoutError> {
    let declared = read_uint(reader, width)?;
    let remaining = reader.len();
    let declared = usize::try_from(declared).map_err(|_| LayoutError::LengthOverrun {
        declared: usize::MAX,
        remaining,
    })?;
    if declared > remaining {
        return Err(LayoutError::LengthOverrun {
            declared,
            remaining,
        });
    }
    take(reader, declared)
}

pub fn read_prefixed_payload<P: Payload>(
    reader: &mut &[u8],
    width: usize,
) -> Result<P, LayoutError> {
    let span = read_length_prefixed(reader, width)?;
    P::read_payload(span)
}

/// Fails if anything is left in `reader` after `frame` was decoded.
pub fn expect_end(reader: &[u8], frame: &'static str) -> Result<(), LayoutError> {
    if reader.is_empty() {
        Ok(())
    } else {
        Err(LayoutError::TrailingBytes {
            frame,
            count: reader.len(),
        })
    }
}

pub fn read<T: Readable>(reader: &mut &[u8]) -> Result<T, LayoutError> {
    Ok(T::read(reader)?)
}

pub fn write<T: Writeable>(out: &mut Vec<u8>, value: &T) -> Result<(), LayoutError> {
    value.write(out)?;
    Ok(())
}

/// Decodes a whole span as a single [`Readable`] value.
pub fn read_exact<T: Readable>(span: &[u8], frame: &'static str) -> Result<T, LayoutError> {
    let mut reader = span;
    let value = read(&mut reader)?;
    expect_end(reader, frame)?;
    Ok(value)
}

fn take<'a>(reader: &mut &'a [u8], len: usize) -> Result<&'a [u8], LayoutError> {
    if reader.len() < len {
        return Err(LayoutError::Truncated);
    }
    let (head, tail) = reader.split_at(len);
    *reader = tail;
    Ok(head)
}
