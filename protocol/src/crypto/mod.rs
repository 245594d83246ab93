//! # Cryptographic Primitives
//!
//! The signing side of the P2P envelope. Everything here is a thin,
//! type-safe wrapper around audited implementations:
//!
//! - **secp256k1 ECDSA** (`k256`) for recoverable message signatures.
//! - **SHA-512/256** (`sha2`) for message digests and transaction ids.
//!
//! Signatures are stored in the 65-byte `[recovery_id, r, s]` layout that
//! the wire format carries, so a verifier can recover the signer's public
//! key from the message alone.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{hash160, sha512_256};
pub use keys::{KeyError, StacksPrivateKey, StacksPublicKey};
pub use signatures::{recover_public_key, sign_message_hash, verify_message_hash};
