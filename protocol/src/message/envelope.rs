//! The outer message structure exchanged between peers.
//!
//! ```text
//! preamble (165) ‖ relayers (vec of RelayData) ‖ payload (type id ‖ body)
//! ```
//!
//! `preamble.payload_len` is the byte length of everything after the
//! preamble. Signing has to measure that tail before the preamble (which
//! the signature also covers) can be finalised, so [`sign`] serializes the
//! tail into a scratch buffer first.
//!
//! A relaying node appends itself to the relay path and re-signs with
//! [`sign_relay`], so `payload_len` always matches the encoded tail.
//!
//! [`sign`]: StacksMessageEnvelope::sign
//! [`sign_relay`]: StacksMessageEnvelope::sign_relay

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::error::MessageError;
use super::payload::StacksMessageType;
use super::preamble::Preamble;
use super::relay::{NeighborAddress, RelayData, RelayDataVec};
use crate::codec::{CodecError, Encodeable};
use crate::config::{MAX_PAYLOAD_LEN, MAX_RELAYERS_LEN};
use crate::crypto::{StacksPrivateKey, StacksPublicKey};
use crate::types::BurnchainHeaderHash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StacksMessageEnvelope {
    pub preamble: Preamble,
    pub relayers: RelayDataVec,
    pub payload: StacksMessageType,
}

impl StacksMessageEnvelope {
    /// An unsigned, unrelayed message.
    pub fn new(
        peer_version: u32,
        network_id: u32,
        seq: u32,
        burn_block_height: u64,
        burn_block_hash: BurnchainHeaderHash,
        burn_stable_block_height: u64,
        burn_stable_block_hash: BurnchainHeaderHash,
        payload: StacksMessageType,
    ) -> Self {
        Self {
            preamble: Preamble::new(
                peer_version,
                network_id,
                seq,
                burn_block_height,
                burn_block_hash,
                burn_stable_block_height,
                burn_stable_block_hash,
            ),
            relayers: RelayDataVec::new(),
            payload,
        }
    }

    /// Encoded `relayers` followed by the encoded payload.
    fn content_with(&self, relayers: &RelayDataVec) -> BytesMut {
        let mut content = BytesMut::new();
        relayers.encode(&mut content);
        self.payload.encode(&mut content);
        content
    }

    /// A copy of the preamble with `seq` and the measured `payload_len`,
    /// signed over `relayers` and the payload. `self` is not touched.
    fn sealed_preamble(
        &self,
        relayers: &RelayDataVec,
        seq: u32,
        key: &StacksPrivateKey,
    ) -> Result<Preamble, MessageError> {
        let content = self.content_with(relayers);
        if content.len() > MAX_PAYLOAD_LEN {
            return Err(MessageError::PayloadTooLarge {
                len: content.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        let mut preamble = self.preamble.clone();
        preamble.seq = seq;
        preamble.payload_len = content.len() as u32;
        preamble.sign(key, &content)?;
        Ok(preamble)
    }

    /// Signs a message that has not been relayed.
    ///
    /// Sets `preamble.payload_len` to the measured length of the encoded
    /// relayers and payload, then signs the preamble over that content. On
    /// any error neither `payload_len` nor the signature change.
    pub fn sign(&mut self, key: &StacksPrivateKey) -> Result<(), MessageError> {
        if !self.relayers.is_empty() {
            return Err(MessageError::RelayedMessage(self.relayers.len()));
        }

        self.preamble = self.sealed_preamble(&self.relayers, self.preamble.seq, key)?;

        debug!(
            seq = self.preamble.seq,
            message_type = self.payload.name(),
            payload_len = self.preamble.payload_len,
            "signed message"
        );
        Ok(())
    }

    /// Forwards a received message as `local_peer`.
    ///
    /// Appends a relay entry carrying the sender's sequence number, takes
    /// `seq` as the new sequence number, re-measures `payload_len` and
    /// re-signs with the relaying node's key. The signature therefore always
    /// belongs to the last hop. On any error the envelope is unchanged.
    pub fn sign_relay(
        &mut self,
        local_peer: NeighborAddress,
        seq: u32,
        key: &StacksPrivateKey,
    ) -> Result<(), MessageError> {
        if self.relayers.len() >= MAX_RELAYERS_LEN {
            return Err(MessageError::TooManyRelayers(self.relayers.len()));
        }

        let mut relayers = self.relayers.clone();
        relayers.push(RelayData {
            peer: local_peer,
            seq: self.preamble.seq,
        });
        let preamble = self.sealed_preamble(&relayers, seq, key)?;
        self.relayers = relayers;
        self.preamble = preamble;

        debug!(
            seq,
            relayers = self.relayers.len(),
            payload_len = self.preamble.payload_len,
            "signed relayed message"
        );
        Ok(())
    }

    /// Checks that `payload_len` describes the content and that the
    /// signature was produced by `public_key`.
    pub fn verify(&self, public_key: &StacksPublicKey) -> Result<(), MessageError> {
        let content = self.checked_content()?;
        if self.preamble.verify(public_key, &content) {
            Ok(())
        } else {
            Err(MessageError::VerificationFailed)
        }
    }

    /// Recovers the public key that signed this message (the last hop).
    pub fn recover_signer(&self) -> Result<StacksPublicKey, MessageError> {
        let content = self.checked_content()?;
        Ok(self.preamble.recover_signer(&content)?)
    }

    fn checked_content(&self) -> Result<BytesMut, MessageError> {
        let content = self.content_with(&self.relayers);
        if content.len() != self.preamble.payload_len as usize {
            return Err(MessageError::PayloadLengthMismatch {
                declared: self.preamble.payload_len,
                actual: content.len(),
            });
        }
        Ok(content)
    }
}

impl Encodeable for StacksMessageEnvelope {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let preamble = Preamble::decode(source)?;
        let relayers = RelayDataVec::decode(source)?;
        let payload = StacksMessageType::decode(source)?;

        trace!(
            seq = preamble.seq,
            network_id = preamble.network_id,
            relayers = relayers.len(),
            message_type = payload.name(),
            "decoded message envelope"
        );

        Ok(Self {
            preamble,
            relayers,
            payload,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.preamble.encode(target);
        self.relayers.encode(target);
        self.payload.encode(target);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NETWORK_ID_TESTNET, PEER_VERSION_TESTNET, PREAMBLE_ENCODED_SIZE};
    use crate::message::payload::{BlocksInvData, NeighborsData, PingData};
    use crate::types::{Hash160, MessageSignature, PeerAddress};

    fn envelope(payload: StacksMessageType) -> StacksMessageEnvelope {
        StacksMessageEnvelope::new(
            PEER_VERSION_TESTNET,
            NETWORK_ID_TESTNET,
            1,
            12,
            BurnchainHeaderHash([0x12; 32]),
            6,
            BurnchainHeaderHash([0x06; 32]),
            payload,
        )
    }

    fn local_peer(key: &StacksPrivateKey) -> NeighborAddress {
        NeighborAddress {
            addrbytes: PeerAddress([1; 16]),
            port: 20444,
            public_key_hash: key.public_key().hash160(),
        }
    }

    fn relayer(seq: u32) -> RelayData {
        RelayData {
            peer: NeighborAddress {
                addrbytes: PeerAddress([1; 16]),
                port: 20444,
                public_key_hash: Hash160([2; 20]),
            },
            seq,
        }
    }

    #[test]
    fn sign_sets_measured_payload_len() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::Ping(PingData { nonce: 7 }));
        msg.sign(&key).unwrap();

        let mut independent = Vec::new();
        msg.relayers.encode(&mut independent);
        msg.payload.encode(&mut independent);
        assert_eq!(msg.preamble.payload_len as usize, independent.len());
        // 4-byte empty relayer count + 1-byte type id + 4-byte nonce.
        assert_eq!(msg.preamble.payload_len, 9);
        assert_eq!(msg.preamble.seq, 1);
        assert!(!msg.preamble.signature.is_empty());

        let bytes = msg.to_bytes();
        assert_eq!(bytes.len(), PREAMBLE_ENCODED_SIZE + independent.len());
    }

    #[test]
    fn sign_rejects_relayed_message_without_mutation() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::GetNeighbors);
        msg.relayers.push(relayer(3));
        let before = msg.preamble.clone();

        let err = msg.sign(&key).unwrap_err();
        assert!(matches!(err, MessageError::RelayedMessage(1)));
        assert_eq!(msg.preamble, before);
        assert_eq!(msg.preamble.payload_len, 0);
        assert_eq!(msg.preamble.signature, MessageSignature::empty());
    }

    #[test]
    fn signed_envelope_verifies_and_recovers() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::Neighbors(NeighborsData::default()));
        msg.sign(&key).unwrap();

        msg.verify(&key.public_key()).unwrap();
        assert_eq!(msg.recover_signer().unwrap(), key.public_key());
        assert!(matches!(
            msg.verify(&StacksPrivateKey::generate().public_key()),
            Err(MessageError::VerificationFailed)
        ));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::Ping(PingData { nonce: 1 }));
        msg.sign(&key).unwrap();
        msg.payload = StacksMessageType::Ping(PingData { nonce: 2 });
        assert!(matches!(
            msg.verify(&key.public_key()),
            Err(MessageError::VerificationFailed)
        ));
    }

    #[test]
    fn sign_rejects_oversized_body_without_mutation() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::BlocksInv(BlocksInvData {
            bitlen: u16::MAX,
            block_bitvec: vec![0xff; MAX_PAYLOAD_LEN],
            microblocks_bitvec: Vec::new(),
        }));
        let before = msg.preamble.clone();

        let err = msg.sign(&key).unwrap_err();
        match err {
            MessageError::PayloadTooLarge { len, max } => {
                assert_eq!(max, MAX_PAYLOAD_LEN);
                // relayer count + type id + bitlen + two length prefixes + bits
                assert_eq!(len, 4 + 1 + 2 + 4 + MAX_PAYLOAD_LEN + 4);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
        assert_eq!(msg.preamble, before);
    }

    #[test]
    fn relayed_message_is_resigned_with_measured_length() {
        let origin = StacksPrivateKey::generate();
        let relay = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::GetNeighbors);
        msg.sign(&origin).unwrap();
        assert_eq!(msg.preamble.payload_len, 5);

        msg.sign_relay(local_peer(&relay), 40, &relay).unwrap();

        // 4-byte count + one 42-byte relay entry + 1-byte type id.
        assert_eq!(msg.preamble.payload_len, 47);
        assert_eq!(msg.preamble.seq, 40);
        assert_eq!(msg.relayers.len(), 1);
        assert_eq!(msg.relayers[0].seq, 1);
        assert_eq!(
            msg.relayers[0].peer.public_key_hash,
            relay.public_key().hash160()
        );

        let bytes = msg.to_bytes();
        assert_eq!(
            bytes.len(),
            PREAMBLE_ENCODED_SIZE + msg.preamble.payload_len as usize
        );
        msg.verify(&relay.public_key()).unwrap();
        assert_eq!(msg.recover_signer().unwrap(), relay.public_key());
        assert!(matches!(
            msg.verify(&origin.public_key()),
            Err(MessageError::VerificationFailed)
        ));
    }

    #[test]
    fn edited_relay_path_reports_length_mismatch() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::GetNeighbors);
        msg.sign(&key).unwrap();
        msg.relayers.push(relayer(1));
        assert!(matches!(
            msg.verify(&key.public_key()),
            Err(MessageError::PayloadLengthMismatch {
                declared: 5,
                actual: 47
            })
        ));
    }

    #[test]
    fn relay_path_is_bounded_and_failure_leaves_envelope_unchanged() {
        let key = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::GetNeighbors);
        msg.sign(&key).unwrap();
        for seq in 0..MAX_RELAYERS_LEN as u32 {
            msg.sign_relay(local_peer(&key), seq + 2, &key).unwrap();
        }
        let before = msg.clone();

        assert!(matches!(
            msg.sign_relay(local_peer(&key), 99, &key),
            Err(MessageError::TooManyRelayers(n)) if n == MAX_RELAYERS_LEN
        ));
        assert_eq!(msg, before);
    }

    #[test]
    fn envelope_roundtrip() {
        let origin = StacksPrivateKey::generate();
        let relay = StacksPrivateKey::generate();
        let mut msg = envelope(StacksMessageType::Ping(PingData { nonce: 77 }));
        msg.sign(&origin).unwrap();
        msg.sign_relay(local_peer(&relay), 4, &relay).unwrap();

        let decoded = StacksMessageEnvelope::from_bytes(&msg.to_bytes()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.relayers.len(), 1);
        decoded.verify(&relay.public_key()).unwrap();
    }

    #[test]
    fn decode_reads_preamble_relayers_then_payload() {
        let msg = envelope(StacksMessageType::GetNeighbors);
        let mut bytes = msg.to_bytes();
        // Preamble alone is an underrun on the relayer count.
        bytes.truncate(PREAMBLE_ENCODED_SIZE);
        assert!(matches!(
            StacksMessageEnvelope::from_bytes(&bytes),
            Err(CodecError::Underrun { .. })
        ));
    }
}
