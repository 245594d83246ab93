//! # Wire Primitives
//!
//! The leaf types every larger entity is assembled from: fixed-width hashes
//! and keys, validated names and strings, and addresses/principals.

pub mod address;
pub mod hashes;
pub mod names;

pub use address::{PrincipalData, StacksAddress};
pub use hashes::{
    BlockHeaderHash, BurnchainHeaderHash, CoinbasePayload, ConsensusHash, Hash160,
    MessageSignature, PeerAddress, Sha512Trunc256Sum, StacksPublicKeyBuffer, TokenTransferMemo,
};
pub use names::{ClarityName, ContractName, StacksString, UrlString};
