//! # Recoverable Signatures
//!
//! ECDSA over secp256k1 with public-key recovery. Messages are signed as a
//! 32-byte digest (the caller hashes), and the signature is packed as
//! `[recovery_id, r (32), s (32)]` in a [`MessageSignature`]. `k256` always
//! emits low-S signatures, so the encoding is canonical.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use super::keys::{KeyError, StacksPrivateKey, StacksPublicKey};
use crate::types::MessageSignature;

/// Sign a 32-byte digest.
pub fn sign_message_hash(
    key: &StacksPrivateKey,
    digest: &[u8; 32],
) -> Result<MessageSignature, KeyError> {
    let (signature, recovery_id) = key
        .signing_key()
        .sign_prehash_recoverable(digest)
        .map_err(|_| KeyError::SigningFailed)?;

    let mut out = [0u8; 65];
    out[0] = recovery_id.to_byte();
    out[1..].copy_from_slice(&signature.to_bytes());
    Ok(MessageSignature(out))
}

fn split_signature(signature: &MessageSignature) -> Result<(Signature, RecoveryId), KeyError> {
    let bytes = signature.as_bytes();
    let recovery_id = RecoveryId::from_byte(bytes[0]).ok_or(KeyError::InvalidSignature)?;
    let sig = Signature::from_slice(&bytes[1..]).map_err(|_| KeyError::InvalidSignature)?;
    Ok((sig, recovery_id))
}

/// Recover the signer's public key from a digest and its signature.
pub fn recover_public_key(
    digest: &[u8; 32],
    signature: &MessageSignature,
) -> Result<StacksPublicKey, KeyError> {
    let (sig, recovery_id) = split_signature(signature)?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| KeyError::InvalidSignature)?;
    Ok(StacksPublicKey::from_verifying_key(verifying_key))
}

/// Check a signature against a known public key.
///
/// Returns `false` for malformed signatures as well as wrong keys.
pub fn verify_message_hash(
    public_key: &StacksPublicKey,
    digest: &[u8; 32],
    signature: &MessageSignature,
) -> bool {
    let Ok((sig, _)) = split_signature(signature) else {
        return false;
    };
    public_key
        .verifying_key()
        .verify_prehash(digest, &sig)
        .is_ok()
}
