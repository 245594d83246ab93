//! Errors raised while signing, verifying or assembling message envelopes.

use thiserror::Error;

use crate::codec::CodecError;
use crate::crypto::KeyError;

#[derive(Debug, Error)]
pub enum MessageError {
    /// Only messages with an empty relay path may be signed.
    #[error("cannot sign a relayed message ({0} relayers)")]
    RelayedMessage(usize),

    #[error("message body too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("preamble payload_len is {declared}, content is {actual} bytes")]
    PayloadLengthMismatch { declared: u32, actual: usize },

    #[error("relay path full ({0} relayers)")]
    TooManyRelayers(usize),

    #[error("signature does not match the expected public key")]
    VerificationFailed,

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),
}
