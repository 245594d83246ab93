//! # Message Module
//!
//! Peer-to-peer message envelopes: a signed fixed-size preamble, the path of
//! peers that relayed the message, and a typed payload.
//!
//! ```text
//! preamble.rs — Fixed header, signing digest and signature checks
//! relay.rs    — NeighborAddress and RelayData
//! payload.rs  — StacksMessageType and the per-type bodies
//! envelope.rs — StacksMessageEnvelope, sign/verify
//! error.rs    — MessageError
//! ```
//!
//! Only the originator signs. Relayers append themselves to the relay path
//! and forward the message with the original signature intact.

pub mod envelope;
pub mod error;
pub mod payload;
pub mod preamble;
pub mod relay;

pub use envelope::StacksMessageEnvelope;
pub use error::MessageError;
pub use payload::{
    BlocksAvailableData, BlocksInvData, GetBlocksInv, GetPoxInv, HandshakeAcceptData,
    HandshakeData, NackData, NatPunchData, NeighborsData, PingData, PongData, PoxInvData,
    StacksMessageType,
};
pub use preamble::Preamble;
pub use relay::{NeighborAddress, NeighborAddressVec, RelayData, RelayDataVec};
