//! # Key Management
//!
//! secp256k1 keypairs for signing P2P messages.
//!
//! A node signs every message it originates with its node key; peers
//! recover the public key from the signature and compare its hash against
//! what the handshake advertised. Public keys travel in 33-byte compressed
//! SEC1 form.
//!
//! Key bytes are never logged. The `Debug` impl on [`StacksPrivateKey`]
//! prints the public half only.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::types::{Hash160, StacksPublicKeyBuffer};

/// Errors that can occur during key and signature operations.
///
/// Intentionally vague about *why* something failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    #[error("invalid public key bytes")]
    InvalidPublicKey,

    #[error("invalid signature bytes")]
    InvalidSignature,

    #[error("signing failed")]
    SigningFailed,
}

/// A node's secp256k1 signing key.
#[derive(Clone)]
pub struct StacksPrivateKey {
    signing_key: SigningKey,
}

/// The public half of a node key.
#[derive(Clone, PartialEq, Eq)]
pub struct StacksPublicKey {
    verifying_key: VerifyingKey,
}

impl StacksPrivateKey {
    /// Generate a fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Load a key from its 32-byte scalar.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Load a key from hex. A trailing `01` byte, the marker some tooling
    /// appends for "compressed public key", is accepted and ignored.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let scalar = match bytes.len() {
            32 => &bytes[..],
            33 if bytes[32] == 0x01 => &bytes[..32],
            _ => return Err(KeyError::InvalidSecretKey),
        };
        let mut arr = [0u8; 32];
        arr.copy_from_slice(scalar);
        Self::from_bytes(&arr)
    }

    /// Export the raw 32-byte scalar. Handle with care.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn public_key(&self) -> StacksPublicKey {
        StacksPublicKey {
            verifying_key: VerifyingKey::from(&self.signing_key),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for StacksPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StacksPrivateKey(pub={})", self.public_key().to_hex())
    }
}

impl StacksPublicKey {
    /// Parse a SEC1-encoded key, compressed (33 bytes) or uncompressed (65).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_slice(&bytes)
    }

    /// The 33-byte compressed encoding.
    pub fn to_compressed(&self) -> [u8; 33] {
        let point = self.verifying_key.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The key as it appears in handshake messages.
    pub fn to_buffer(&self) -> StacksPublicKeyBuffer {
        StacksPublicKeyBuffer(self.to_compressed())
    }

    pub fn from_buffer(buffer: &StacksPublicKeyBuffer) -> Result<Self, KeyError> {
        Self::from_slice(buffer.as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Hash160 of the compressed key, as used in p2pkh addresses.
    pub fn hash160(&self) -> Hash160 {
        super::hash::hash160(&self.to_compressed())
    }

    pub(crate) fn from_verifying_key(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl fmt::Debug for StacksPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StacksPublicKey({})", self.to_hex())
    }
}

impl fmt::Display for StacksPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
