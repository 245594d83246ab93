//! # Hashing Utilities
//!
//! SHA-512/256 is SHA-512 with a distinct IV, truncated to 32 bytes. It is
//! what Stacks uses for transaction ids and for the digest a preamble
//! signature commits to. It is also faster than SHA-256 on 64-bit hardware.
//!
//! Hash160 (RIPEMD-160 of SHA-256) names public keys in addresses and
//! neighbor records.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512_256};

use crate::types::Hash160;

/// Compute the SHA-512/256 digest of `data`.
///
/// # Example
///
/// ```
/// use stacks_p2p::crypto::sha512_256;
///
/// let digest = sha512_256(b"stacks");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    sha512_256_parts(&[data])
}

/// Digest the concatenation of `parts` without first copying them together.
pub fn sha512_256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// RIPEMD-160(SHA-256(data)).
pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = Sha256::digest(data);
    let mut output = [0u8; 20];
    output.copy_from_slice(&Ripemd160::digest(sha));
    Hash160(output)
}
