//! Error types for the wire codec.
//!
//! Every decode path that can fail returns a [`CodecError`]. Encoding is
//! infallible: the in-memory types only admit values that have a canonical
//! byte representation.

use thiserror::Error;

/// Errors produced while decoding wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The source ran out of bytes before a required field was read.
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    Underrun {
        /// Bytes the current field required.
        needed: usize,
        /// Bytes that were actually left in the source.
        remaining: usize,
    },

    /// A complete value was decoded but input bytes were left over.
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    /// A discriminant byte did not name any known variant.
    #[error("invalid {what} type id: 0x{id:02x}")]
    InvalidTypeId {
        /// The entity whose discriminant was being read.
        what: &'static str,
        /// The offending byte.
        id: u8,
    },

    /// A recognised message type this codec does not carry.
    #[error("unsupported message type id: {0}")]
    UnsupportedMessageType(u8),

    /// A name or string field violated its length or charset rules.
    #[error("invalid {what}: {reason}")]
    InvalidString {
        /// The kind of string field.
        what: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// Nested Clarity values exceeded the maximum depth.
    #[error("clarity value nesting exceeds depth {0}")]
    DepthExceeded(usize),
}
