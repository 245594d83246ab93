//! Checked reads over a [`bytes::Buf`].
//!
//! `Buf::get_*` panics when the source is short. Decoders must never panic
//! on peer input, so every read goes through these helpers, which turn a
//! short source into [`CodecError::Underrun`]. Integers are big-endian.

use bytes::Buf;

use super::error::CodecError;

/// Fails with [`CodecError::Underrun`] unless `needed` bytes are available.
pub fn ensure_remaining<B: Buf>(source: &B, needed: usize) -> Result<(), CodecError> {
    let remaining = source.remaining();
    if remaining < needed {
        return Err(CodecError::Underrun { needed, remaining });
    }
    Ok(())
}

pub fn read_u8<B: Buf>(source: &mut B) -> Result<u8, CodecError> {
    ensure_remaining(source, 1)?;
    Ok(source.get_u8())
}

pub fn read_u16<B: Buf>(source: &mut B) -> Result<u16, CodecError> {
    ensure_remaining(source, 2)?;
    Ok(source.get_u16())
}

pub fn read_u32<B: Buf>(source: &mut B) -> Result<u32, CodecError> {
    ensure_remaining(source, 4)?;
    Ok(source.get_u32())
}

pub fn read_u64<B: Buf>(source: &mut B) -> Result<u64, CodecError> {
    ensure_remaining(source, 8)?;
    Ok(source.get_u64())
}

pub fn read_u128<B: Buf>(source: &mut B) -> Result<u128, CodecError> {
    ensure_remaining(source, 16)?;
    Ok(source.get_u128())
}

pub fn read_i128<B: Buf>(source: &mut B) -> Result<i128, CodecError> {
    ensure_remaining(source, 16)?;
    Ok(source.get_i128())
}

/// Reads exactly `N` bytes into a fixed-size array.
pub fn read_array<B: Buf, const N: usize>(source: &mut B) -> Result<[u8; N], CodecError> {
    ensure_remaining(source, N)?;
    let mut out = [0u8; N];
    source.copy_to_slice(&mut out);
    Ok(out)
}

/// Reads `len` raw bytes. Availability is checked before allocating, so a
/// hostile length prefix cannot force a large allocation.
pub fn read_bytes<B: Buf>(source: &mut B, len: usize) -> Result<Vec<u8>, CodecError> {
    ensure_remaining(source, len)?;
    let mut out = vec![0u8; len];
    source.copy_to_slice(&mut out);
    Ok(out)
}

/// Reads a 4-byte length prefix followed by that many bytes.
pub fn read_prefixed_bytes<B: Buf>(source: &mut B) -> Result<Vec<u8>, CodecError> {
    let len = read_u32(source)? as usize;
    read_bytes(source, len)
}
