//! The fixed-size message header.
//!
//! ```text
//! peer_version (4) ‖ network_id (4) ‖ seq (4)
//!   ‖ burn_block_height (8) ‖ burn_block_hash (32)
//!   ‖ burn_stable_block_height (8) ‖ burn_stable_block_hash (32)
//!   ‖ additional_data (4) ‖ signature (65) ‖ payload_len (4)
//! ```
//!
//! The signature covers the header itself (with the signature field zeroed)
//! followed by the encoded relayers and payload.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::cursor::{read_u32, read_u64};
use crate::codec::{CodecError, Encodeable};
use crate::crypto::hash::sha512_256_parts;
use crate::crypto::{
    recover_public_key, sign_message_hash, verify_message_hash, KeyError, StacksPrivateKey,
    StacksPublicKey,
};
use crate::types::{BurnchainHeaderHash, MessageSignature};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preamble {
    pub peer_version: u32,
    pub network_id: u32,
    pub seq: u32,
    pub burn_block_height: u64,
    pub burn_block_hash: BurnchainHeaderHash,
    pub burn_stable_block_height: u64,
    pub burn_stable_block_hash: BurnchainHeaderHash,
    pub additional_data: u32,
    pub signature: MessageSignature,
    /// Byte length of the encoded relayers and payload that follow.
    pub payload_len: u32,
}

impl Preamble {
    /// A preamble with an empty signature and zero payload length.
    pub fn new(
        peer_version: u32,
        network_id: u32,
        seq: u32,
        burn_block_height: u64,
        burn_block_hash: BurnchainHeaderHash,
        burn_stable_block_height: u64,
        burn_stable_block_hash: BurnchainHeaderHash,
    ) -> Self {
        Self {
            peer_version,
            network_id,
            seq,
            burn_block_height,
            burn_block_hash,
            burn_stable_block_height,
            burn_stable_block_hash,
            additional_data: 0,
            signature: MessageSignature::empty(),
            payload_len: 0,
        }
    }

    /// SHA-512/256 over this header (signature zeroed) and `content`.
    pub fn signing_digest(&self, content: &[u8]) -> [u8; 32] {
        let mut unsigned = self.clone();
        unsigned.signature = MessageSignature::empty();
        let header = unsigned.to_bytes();
        sha512_256_parts(&[&header, content])
    }

    /// Signs this header together with `content` and stores the signature.
    ///
    /// `payload_len` must already describe `content`; it is part of what gets
    /// signed. On error the preamble is left untouched.
    pub fn sign(&mut self, key: &StacksPrivateKey, content: &[u8]) -> Result<(), KeyError> {
        let digest = self.signing_digest(content);
        self.signature = sign_message_hash(key, &digest)?;
        debug!(
            seq = self.seq,
            payload_len = self.payload_len,
            "signed message preamble"
        );
        Ok(())
    }

    /// Checks the stored signature against `public_key`.
    pub fn verify(&self, public_key: &StacksPublicKey, content: &[u8]) -> bool {
        let digest = self.signing_digest(content);
        verify_message_hash(public_key, &digest, &self.signature)
    }

    /// Recovers the public key that produced the stored signature.
    pub fn recover_signer(&self, content: &[u8]) -> Result<StacksPublicKey, KeyError> {
        let digest = self.signing_digest(content);
        recover_public_key(&digest, &self.signature)
    }
}

impl Encodeable for Preamble {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            peer_version: read_u32(source)?,
            network_id: read_u32(source)?,
            seq: read_u32(source)?,
            burn_block_height: read_u64(source)?,
            burn_block_hash: BurnchainHeaderHash::decode(source)?,
            burn_stable_block_height: read_u64(source)?,
            burn_stable_block_hash: BurnchainHeaderHash::decode(source)?,
            additional_data: read_u32(source)?,
            signature: MessageSignature::decode(source)?,
            payload_len: read_u32(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u32(self.peer_version);
        target.put_u32(self.network_id);
        target.put_u32(self.seq);
        target.put_u64(self.burn_block_height);
        self.burn_block_hash.encode(target);
        target.put_u64(self.burn_stable_block_height);
        self.burn_stable_block_hash.encode(target);
        target.put_u32(self.additional_data);
        self.signature.encode(target);
        target.put_u32(self.payload_len);
    }

    fn encoded_len(&self) -> usize {
        crate::config::PREAMBLE_ENCODED_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NETWORK_ID_TESTNET, PEER_VERSION_TESTNET, PREAMBLE_ENCODED_SIZE};

    fn preamble() -> Preamble {
        Preamble::new(
            PEER_VERSION_TESTNET,
            NETWORK_ID_TESTNET,
            7,
            100,
            BurnchainHeaderHash([0xaa; 32]),
            94,
            BurnchainHeaderHash([0xbb; 32]),
        )
    }

    #[test]
    fn encoded_size_is_fixed() {
        let p = preamble();
        let bytes = p.to_bytes();
        assert_eq!(bytes.len(), PREAMBLE_ENCODED_SIZE);
        assert_eq!(p.encoded_len(), PREAMBLE_ENCODED_SIZE);
        assert_eq!(&bytes[0..4], &PEER_VERSION_TESTNET.to_be_bytes());
        assert_eq!(&bytes[8..12], &7u32.to_be_bytes());
        assert_eq!(&bytes[161..165], &[0, 0, 0, 0]);
    }

    #[test]
    fn roundtrip() {
        let mut p = preamble();
        p.additional_data = 0xdead_beef;
        p.payload_len = 42;
        assert_eq!(Preamble::from_bytes(&p.to_bytes()).unwrap(), p);
    }

    #[test]
    fn truncated_is_underrun() {
        let bytes = preamble().to_bytes();
        let err = Preamble::from_bytes(&bytes[..100]).unwrap_err();
        assert!(matches!(err, CodecError::Underrun { .. }));
    }

    #[test]
    fn sign_verify_recover() {
        let key = StacksPrivateKey::generate();
        let mut p = preamble();
        p.payload_len = 3;
        p.sign(&key, b"abc").unwrap();

        assert!(!p.signature.is_empty());
        assert!(p.verify(&key.public_key(), b"abc"));
        assert!(!p.verify(&key.public_key(), b"abd"));
        assert!(!p.verify(&StacksPrivateKey::generate().public_key(), b"abc"));
        assert_eq!(p.recover_signer(b"abc").unwrap(), key.public_key());
    }

    #[test]
    fn digest_ignores_stored_signature() {
        let key = StacksPrivateKey::generate();
        let mut p = preamble();
        let before = p.signing_digest(b"xyz");
        p.sign(&key, b"xyz").unwrap();
        assert_eq!(p.signing_digest(b"xyz"), before);
    }

    #[test]
    fn signature_covers_header_fields() {
        let key = StacksPrivateKey::generate();
        let mut p = preamble();
        p.sign(&key, b"").unwrap();
        p.seq += 1;
        assert!(!p.verify(&key.public_key(), b""));
    }
}
