//! # Wire Codec
//!
//! The symmetric read/write contract every Stacks wire entity implements.
//!
//! The P2P format is a flat concatenation of fields: no padding, no
//! alignment, no offset tables. Integers are big-endian, variable-length
//! collections carry a 4-byte element count, and variant shapes are
//! introduced by a 1-byte discriminant. Decoding walks the stream strictly
//! left to right and encoding mirrors it exactly, so for every value `x`:
//!
//! ```text
//! decode(encode(x)) == x        encode(decode(bytes)) == bytes
//! ```
//!
//! ## Layout
//!
//! ```text
//! error.rs  — CodecError
//! cursor.rs — checked big-endian reads over bytes::Buf
//! vector.rs — MessageVec<T>, the count-prefixed container
//! ```

pub mod cursor;
pub mod error;
pub mod vector;

use bytes::{Buf, BufMut};

pub use error::CodecError;
pub use vector::MessageVec;

/// Read and write a value in canonical wire form.
///
/// `decode` consumes exactly the bytes of one instance and leaves the source
/// positioned after them. `encode` appends exactly those bytes to the target.
pub trait Encodeable: Sized {
    /// Decodes one instance from the front of `source`.
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError>;

    /// Appends the canonical encoding of `self` to `target`.
    fn encode<B: BufMut>(&self, target: &mut B);

    /// Encodes into a fresh byte vector.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    /// Number of bytes `encode` writes.
    fn encoded_len(&self) -> usize {
        self.to_bytes().len()
    }

    /// Decodes a value that must span the whole of `bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut source = bytes;
        let value = Self::decode(&mut source)?;
        if !source.is_empty() {
            return Err(CodecError::TrailingBytes(source.len()));
        }
        Ok(value)
    }
}

impl Encodeable for u8 {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        cursor::read_u8(source)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(*self);
    }
}

impl Encodeable for u16 {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        cursor::read_u16(source)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u16(*self);
    }
}

impl Encodeable for u32 {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        cursor::read_u32(source)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u32(*self);
    }
}

impl Encodeable for u64 {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        cursor::read_u64(source)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u64(*self);
    }
}

impl<A: Encodeable, B: Encodeable> Encodeable for (A, B) {
    fn decode<S: Buf>(source: &mut S) -> Result<Self, CodecError> {
        let first = A::decode(source)?;
        let second = B::decode(source)?;
        Ok((first, second))
    }

    fn encode<T: BufMut>(&self, target: &mut T) {
        self.0.encode(target);
        self.1.encode(target);
    }
}

/// Writes a 4-byte length prefix followed by the raw bytes.
pub fn write_prefixed_bytes<B: BufMut>(target: &mut B, bytes: &[u8]) {
    target.put_u32(bytes.len() as u32);
    target.put_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_trailing_input() {
        assert_eq!(
            u16::from_bytes(&[0x00, 0x01, 0x02]),
            Err(CodecError::TrailingBytes(1))
        );
        assert_eq!(u16::from_bytes(&[0x00, 0x01]), Ok(1));
    }

    #[test]
    fn encoded_len_matches_width() {
        assert_eq!(7u8.encoded_len(), 1);
        assert_eq!(7u16.encoded_len(), 2);
        assert_eq!(7u32.encoded_len(), 4);
        assert_eq!(7u64.encoded_len(), 8);
    }

    #[test]
    fn prefixed_bytes_roundtrip() {
        let mut out = Vec::new();
        write_prefixed_bytes(&mut out, b"abc");
        assert_eq!(out, vec![0, 0, 0, 3, b'a', b'b', b'c']);

        let mut src = out.as_slice();
        assert_eq!(cursor::read_prefixed_bytes(&mut src).unwrap(), b"abc");
    }

    #[test]
    fn pair_is_concatenation() {
        let pair = (0x0102u16, 0x03u8);
        assert_eq!(pair.to_bytes(), vec![1, 2, 3]);
        assert_eq!(<(u16, u8)>::from_bytes(&[1, 2, 3]).unwrap(), pair);
    }
}
