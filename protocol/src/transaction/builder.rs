//! The transaction entity and a builder for constructing it.
//!
//! # Canonical Byte Format
//!
//! ```text
//! version (1) ‖ chain_id (4) ‖ authorization ‖ anchor_mode (1)
//!   ‖ post_condition_mode (1) ‖ post_conditions (vec)
//!   ‖ payload_type_id (1) ‖ payload body
//! ```
//!
//! ## The payload type id
//!
//! `payload_type_id` is stored next to the payload rather than derived from
//! it. Decoding records the byte it read (including ids that fell back to a
//! coinbase body), and encoding writes it back unchanged, so
//! `encode(decode(bytes)) == bytes` holds for every decodable input.
//!
//! The flip side: a transaction assembled with [`StacksTransaction::from_parts`]
//! and a mismatched `(payload_type_id, payload)` pair encodes to bytes that
//! decode to something else. [`StacksTransaction::new`] and
//! [`TransactionBuilder`] derive the id from the payload and cannot produce
//! such a value; [`StacksTransaction::has_consistent_payload_type`] reports
//! whether an arbitrary instance is self-consistent.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::authorization::TransactionAuth;
use super::payload::TransactionPayload;
use super::post_condition::{PostConditionVec, TransactionPostCondition};
use crate::codec::cursor::{read_u32, read_u8};
use crate::codec::{CodecError, Encodeable, MessageVec};
use crate::config;
use crate::crypto::hash::sha512_256;

/// Count-prefixed transactions, e.g. the body of a block.
pub type TransactionVec = MessageVec<StacksTransaction>;

// ---------------------------------------------------------------------------
// StacksTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StacksTransaction {
    /// Mainnet (`0x00`) or testnet (`0x80`).
    pub version_number: u8,
    pub chain_id: u32,
    pub authorization: TransactionAuth,
    pub anchor_mode: u8,
    pub post_condition_mode: u8,
    pub post_conditions: PostConditionVec,
    /// The discriminant written before the payload body. See the module docs.
    pub payload_type_id: u8,
    pub payload: TransactionPayload,
}

impl StacksTransaction {
    /// Assembles a transaction whose payload type id is derived from `payload`.
    pub fn new(
        version_number: u8,
        chain_id: u32,
        authorization: TransactionAuth,
        anchor_mode: u8,
        post_condition_mode: u8,
        post_conditions: PostConditionVec,
        payload: TransactionPayload,
    ) -> Self {
        Self {
            version_number,
            chain_id,
            authorization,
            anchor_mode,
            post_condition_mode,
            post_conditions,
            payload_type_id: payload.type_id(),
            payload,
        }
    }

    /// Assembles a transaction with an explicit payload type id.
    ///
    /// No consistency check is made: the id is written to the wire as given.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        version_number: u8,
        chain_id: u32,
        authorization: TransactionAuth,
        anchor_mode: u8,
        post_condition_mode: u8,
        post_conditions: PostConditionVec,
        payload_type_id: u8,
        payload: TransactionPayload,
    ) -> Self {
        Self {
            version_number,
            chain_id,
            authorization,
            anchor_mode,
            post_condition_mode,
            post_conditions,
            payload_type_id,
            payload,
        }
    }

    /// `true` when decoding this transaction's encoding yields the same payload
    /// variant. Ids at or above the coinbase id all select a coinbase body.
    pub fn has_consistent_payload_type(&self) -> bool {
        match &self.payload {
            TransactionPayload::Coinbase(_) => {
                self.payload_type_id >= config::PAYLOAD_TYPE_COINBASE
            }
            other => self.payload_type_id == other.type_id(),
        }
    }

    /// Transaction id: SHA-512/256 of the encoded transaction.
    pub fn txid(&self) -> [u8; 32] {
        sha512_256(&self.to_bytes())
    }

    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid())
    }

    pub fn is_mainnet(&self) -> bool {
        self.version_number == config::TX_VERSION_MAINNET
    }
}

impl Encodeable for StacksTransaction {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let version_number = read_u8(source)?;
        let chain_id = read_u32(source)?;
        let authorization = TransactionAuth::decode(source)?;
        let anchor_mode = read_u8(source)?;
        let post_condition_mode = read_u8(source)?;
        let post_conditions = PostConditionVec::decode(source)?;
        let payload_type_id = read_u8(source)?;
        let payload = TransactionPayload::decode_with_type_id(payload_type_id, source)?;

        trace!(
            version_number,
            chain_id,
            payload_type_id,
            post_conditions = post_conditions.len(),
            "decoded transaction"
        );

        Ok(Self {
            version_number,
            chain_id,
            authorization,
            anchor_mode,
            post_condition_mode,
            post_conditions,
            payload_type_id,
            payload,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.version_number);
        target.put_u32(self.chain_id);
        self.authorization.encode(target);
        target.put_u8(self.anchor_mode);
        target.put_u8(self.post_condition_mode);
        self.post_conditions.encode(target);
        target.put_u8(self.payload_type_id);
        self.payload.encode(target);
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`StacksTransaction`].
///
/// Defaults to mainnet, on-chain-only anchoring and deny-mode
/// post-conditions.
///
/// ```
/// use stacks_p2p::transaction::{SpendingCondition, TransactionAuth, TransactionBuilder, TransactionPayload};
/// use stacks_p2p::types::{CoinbasePayload, Hash160};
///
/// let auth = TransactionAuth::Standard(SpendingCondition::new_singlesig_p2pkh(Hash160([1; 20]), 0, 0));
/// let tx = TransactionBuilder::new(auth, TransactionPayload::Coinbase(CoinbasePayload([0; 32])))
///     .testnet()
///     .build();
/// assert!(tx.has_consistent_payload_type());
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version_number: u8,
    chain_id: u32,
    authorization: TransactionAuth,
    anchor_mode: u8,
    post_condition_mode: u8,
    post_conditions: Vec<TransactionPostCondition>,
    payload: TransactionPayload,
}

impl TransactionBuilder {
    pub fn new(authorization: TransactionAuth, payload: TransactionPayload) -> Self {
        Self {
            version_number: config::TX_VERSION_MAINNET,
            chain_id: config::CHAIN_ID_MAINNET,
            authorization,
            anchor_mode: config::ANCHOR_MODE_ON_CHAIN_ONLY,
            post_condition_mode: config::POST_CONDITION_MODE_DENY,
            post_conditions: Vec::new(),
            payload,
        }
    }

    /// Switches version and chain id to testnet.
    pub fn testnet(mut self) -> Self {
        self.version_number = config::TX_VERSION_TESTNET;
        self.chain_id = config::CHAIN_ID_TESTNET;
        self
    }

    pub fn version_number(mut self, version_number: u8) -> Self {
        self.version_number = version_number;
        self
    }

    pub fn chain_id(mut self, chain_id: u32) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn anchor_mode(mut self, anchor_mode: u8) -> Self {
        self.anchor_mode = anchor_mode;
        self
    }

    pub fn post_condition_mode(mut self, post_condition_mode: u8) -> Self {
        self.post_condition_mode = post_condition_mode;
        self
    }

    pub fn post_condition(mut self, post_condition: TransactionPostCondition) -> Self {
        self.post_conditions.push(post_condition);
        self
    }

    pub fn build(self) -> StacksTransaction {
        StacksTransaction::new(
            self.version_number,
            self.chain_id,
            self.authorization,
            self.anchor_mode,
            self.post_condition_mode,
            self.post_conditions.into(),
            self.payload,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
