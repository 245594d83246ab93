// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Stacks P2P Wire Codec
//!
//! Byte-exact encoding and decoding of the messages Stacks nodes exchange
//! over their peer-to-peer network, plus the signing step that seals an
//! outgoing message.
//!
//! ## Architecture
//!
//! - **codec** — The `Encodeable` contract, checked cursor reads and the
//!   count-prefixed `MessageVec` container.
//! - **types** — Fixed-width hashes, validated names, addresses.
//! - **crypto** — SHA-512/256, Hash160 and recoverable secp256k1 signatures.
//! - **transaction** — Transactions, their authorization, post-conditions,
//!   Clarity arguments and payloads.
//! - **message** — Preamble, relayers, typed payloads and the envelope.
//! - **config** — Protocol constants and network parameters.
//!
//! ## Example
//!
//! ```
//! use stacks_p2p::codec::Encodeable;
//! use stacks_p2p::config::{NETWORK_ID_TESTNET, PEER_VERSION_TESTNET};
//! use stacks_p2p::crypto::StacksPrivateKey;
//! use stacks_p2p::message::{PingData, StacksMessageEnvelope, StacksMessageType};
//! use stacks_p2p::types::BurnchainHeaderHash;
//!
//! let key = StacksPrivateKey::generate();
//! let mut msg = StacksMessageEnvelope::new(
//!     PEER_VERSION_TESTNET,
//!     NETWORK_ID_TESTNET,
//!     1,
//!     100,
//!     BurnchainHeaderHash([0; 32]),
//!     94,
//!     BurnchainHeaderHash([0; 32]),
//!     StacksMessageType::Ping(PingData { nonce: 42 }),
//! );
//! msg.sign(&key).unwrap();
//!
//! let decoded = StacksMessageEnvelope::from_bytes(&msg.to_bytes()).unwrap();
//! assert_eq!(decoded.recover_signer().unwrap(), key.public_key());
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod message;
pub mod transaction;
pub mod types;
