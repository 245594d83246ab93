//! The typed payload container: a 1-byte message type id followed by the
//! body for that type.
//!
//! Block and microblock bodies (ids 11 and 12) need a full block codec and
//! are rejected with [`CodecError::UnsupportedMessageType`].

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::relay::NeighborAddressVec;
use crate::codec::cursor::{read_prefixed_bytes, read_u16, read_u32, read_u64, read_u8};
use crate::codec::{write_prefixed_bytes, CodecError, Encodeable, MessageVec};
use crate::config::*;
use crate::transaction::StacksTransaction;
use crate::types::{
    BurnchainHeaderHash, ConsensusHash, PeerAddress, StacksPublicKeyBuffer, UrlString,
};

// ---------------------------------------------------------------------------
// Handshake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeData {
    pub addrbytes: PeerAddress,
    pub port: u16,
    /// Service bit field advertised by the sender.
    pub services: u16,
    pub node_public_key: StacksPublicKeyBuffer,
    /// Burn height after which `node_public_key` should no longer be trusted.
    pub expire_block_height: u64,
    pub data_url: UrlString,
}

impl Encodeable for HandshakeData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            addrbytes: PeerAddress::decode(source)?,
            port: read_u16(source)?,
            services: read_u16(source)?,
            node_public_key: StacksPublicKeyBuffer::decode(source)?,
            expire_block_height: read_u64(source)?,
            data_url: UrlString::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.addrbytes.encode(target);
        target.put_u16(self.port);
        target.put_u16(self.services);
        self.node_public_key.encode(target);
        target.put_u64(self.expire_block_height);
        self.data_url.encode(target);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeAcceptData {
    pub handshake: HandshakeData,
    /// Seconds between expected pings.
    pub heartbeat_interval: u32,
}

impl Encodeable for HandshakeAcceptData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            handshake: HandshakeData::decode(source)?,
            heartbeat_interval: read_u32(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.handshake.encode(target);
        target.put_u32(self.heartbeat_interval);
    }
}

// ---------------------------------------------------------------------------
// Neighbors and inventories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborsData {
    pub neighbors: NeighborAddressVec,
}

impl Encodeable for NeighborsData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            neighbors: NeighborAddressVec::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.neighbors.encode(target);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksInv {
    pub consensus_hash: ConsensusHash,
    pub num_blocks: u16,
}

impl Encodeable for GetBlocksInv {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            consensus_hash: ConsensusHash::decode(source)?,
            num_blocks: read_u16(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.consensus_hash.encode(target);
        target.put_u16(self.num_blocks);
    }
}

/// Block and microblock-stream availability bit vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksInvData {
    /// Number of meaningful bits in each bit vector.
    pub bitlen: u16,
    pub block_bitvec: Vec<u8>,
    pub microblocks_bitvec: Vec<u8>,
}

impl BlocksInvData {
    pub fn has_block(&self, index: u16) -> bool {
        bit_is_set(&self.block_bitvec, self.bitlen, index)
    }

    pub fn has_microblocks(&self, index: u16) -> bool {
        bit_is_set(&self.microblocks_bitvec, self.bitlen, index)
    }
}

impl Encodeable for BlocksInvData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            bitlen: read_u16(source)?,
            block_bitvec: read_prefixed_bytes(source)?,
            microblocks_bitvec: read_prefixed_bytes(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u16(self.bitlen);
        write_prefixed_bytes(target, &self.block_bitvec);
        write_prefixed_bytes(target, &self.microblocks_bitvec);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPoxInv {
    pub consensus_hash: ConsensusHash,
    pub num_cycles: u16,
}

impl Encodeable for GetPoxInv {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            consensus_hash: ConsensusHash::decode(source)?,
            num_cycles: read_u16(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.consensus_hash.encode(target);
        target.put_u16(self.num_cycles);
    }
}

/// Reward-cycle availability bit vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoxInvData {
    pub bitlen: u16,
    pub pox_bitvec: Vec<u8>,
}

impl PoxInvData {
    pub fn has_cycle(&self, index: u16) -> bool {
        bit_is_set(&self.pox_bitvec, self.bitlen, index)
    }
}

impl Encodeable for PoxInvData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            bitlen: read_u16(source)?,
            pox_bitvec: read_prefixed_bytes(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u16(self.bitlen);
        write_prefixed_bytes(target, &self.pox_bitvec);
    }
}

/// Bits are numbered LSB-first within each byte.
fn bit_is_set(bitvec: &[u8], bitlen: u16, index: u16) -> bool {
    if index >= bitlen {
        return false;
    }
    let byte = usize::from(index / 8);
    bitvec
        .get(byte)
        .map_or(false, |b| b & (1 << (index % 8)) != 0)
}

/// `(consensus hash, burn header hash)` pairs announcing available data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksAvailableData {
    pub available: MessageVec<(ConsensusHash, BurnchainHeaderHash)>,
}

impl Encodeable for BlocksAvailableData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            available: MessageVec::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.available.encode(target);
    }
}

// ---------------------------------------------------------------------------
// Control messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NackData {
    pub error_code: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingData {
    pub nonce: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PongData {
    pub nonce: u32,
}

macro_rules! single_u32_body {
    ($ty:ident, $field:ident) => {
        impl Encodeable for $ty {
            fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
                Ok(Self {
                    $field: read_u32(source)?,
                })
            }

            fn encode<B: BufMut>(&self, target: &mut B) {
                target.put_u32(self.$field);
            }
        }
    };
}

single_u32_body!(NackData, error_code);
single_u32_body!(PingData, nonce);
single_u32_body!(PongData, nonce);

impl PongData {
    pub fn from_ping(ping: &PingData) -> Self {
        Self { nonce: ping.nonce }
    }
}

/// The public address a peer observed the requester connecting from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatPunchData {
    pub addrbytes: PeerAddress,
    pub port: u16,
    pub nonce: u32,
}

impl Encodeable for NatPunchData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            addrbytes: PeerAddress::decode(source)?,
            port: read_u16(source)?,
            nonce: read_u32(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.addrbytes.encode(target);
        target.put_u16(self.port);
        target.put_u32(self.nonce);
    }
}

// ---------------------------------------------------------------------------
// StacksMessageType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StacksMessageType {
    Handshake(HandshakeData),
    HandshakeAccept(HandshakeAcceptData),
    HandshakeReject,
    GetNeighbors,
    Neighbors(NeighborsData),
    GetBlocksInv(GetBlocksInv),
    BlocksInv(BlocksInvData),
    GetPoxInv(GetPoxInv),
    PoxInv(PoxInvData),
    BlocksAvailable(BlocksAvailableData),
    MicroblocksAvailable(BlocksAvailableData),
    Transaction(StacksTransaction),
    Nack(NackData),
    Ping(PingData),
    Pong(PongData),
    NatPunchRequest(u32),
    NatPunchReply(NatPunchData),
}

impl StacksMessageType {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Handshake(_) => MESSAGE_ID_HANDSHAKE,
            Self::HandshakeAccept(_) => MESSAGE_ID_HANDSHAKE_ACCEPT,
            Self::HandshakeReject => MESSAGE_ID_HANDSHAKE_REJECT,
            Self::GetNeighbors => MESSAGE_ID_GET_NEIGHBORS,
            Self::Neighbors(_) => MESSAGE_ID_NEIGHBORS,
            Self::GetBlocksInv(_) => MESSAGE_ID_GET_BLOCKS_INV,
            Self::BlocksInv(_) => MESSAGE_ID_BLOCKS_INV,
            Self::GetPoxInv(_) => MESSAGE_ID_GET_POX_INV,
            Self::PoxInv(_) => MESSAGE_ID_POX_INV,
            Self::BlocksAvailable(_) => MESSAGE_ID_BLOCKS_AVAILABLE,
            Self::MicroblocksAvailable(_) => MESSAGE_ID_MICROBLOCKS_AVAILABLE,
            Self::Transaction(_) => MESSAGE_ID_TRANSACTION,
            Self::Nack(_) => MESSAGE_ID_NACK,
            Self::Ping(_) => MESSAGE_ID_PING,
            Self::Pong(_) => MESSAGE_ID_PONG,
            Self::NatPunchRequest(_) => MESSAGE_ID_NAT_PUNCH_REQUEST,
            Self::NatPunchReply(_) => MESSAGE_ID_NAT_PUNCH_REPLY,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Handshake(_) => "Handshake",
            Self::HandshakeAccept(_) => "HandshakeAccept",
            Self::HandshakeReject => "HandshakeReject",
            Self::GetNeighbors => "GetNeighbors",
            Self::Neighbors(_) => "Neighbors",
            Self::GetBlocksInv(_) => "GetBlocksInv",
            Self::BlocksInv(_) => "BlocksInv",
            Self::GetPoxInv(_) => "GetPoxInv",
            Self::PoxInv(_) => "PoxInv",
            Self::BlocksAvailable(_) => "BlocksAvailable",
            Self::MicroblocksAvailable(_) => "MicroblocksAvailable",
            Self::Transaction(_) => "Transaction",
            Self::Nack(_) => "Nack",
            Self::Ping(_) => "Ping",
            Self::Pong(_) => "Pong",
            Self::NatPunchRequest(_) => "NatPunchRequest",
            Self::NatPunchReply(_) => "NatPunchReply",
        }
    }
}

impl Encodeable for StacksMessageType {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let type_id = read_u8(source)?;
        let message = match type_id {
            MESSAGE_ID_HANDSHAKE => Self::Handshake(HandshakeData::decode(source)?),
            MESSAGE_ID_HANDSHAKE_ACCEPT => {
                Self::HandshakeAccept(HandshakeAcceptData::decode(source)?)
            }
            MESSAGE_ID_HANDSHAKE_REJECT => Self::HandshakeReject,
            MESSAGE_ID_GET_NEIGHBORS => Self::GetNeighbors,
            MESSAGE_ID_NEIGHBORS => Self::Neighbors(NeighborsData::decode(source)?),
            MESSAGE_ID_GET_BLOCKS_INV => Self::GetBlocksInv(GetBlocksInv::decode(source)?),
            MESSAGE_ID_BLOCKS_INV => Self::BlocksInv(BlocksInvData::decode(source)?),
            MESSAGE_ID_GET_POX_INV => Self::GetPoxInv(GetPoxInv::decode(source)?),
            MESSAGE_ID_POX_INV => Self::PoxInv(PoxInvData::decode(source)?),
            MESSAGE_ID_BLOCKS_AVAILABLE => {
                Self::BlocksAvailable(BlocksAvailableData::decode(source)?)
            }
            MESSAGE_ID_MICROBLOCKS_AVAILABLE => {
                Self::MicroblocksAvailable(BlocksAvailableData::decode(source)?)
            }
            MESSAGE_ID_BLOCKS | MESSAGE_ID_MICROBLOCKS => {
                return Err(CodecError::UnsupportedMessageType(type_id));
            }
            MESSAGE_ID_TRANSACTION => Self::Transaction(StacksTransaction::decode(source)?),
            MESSAGE_ID_NACK => Self::Nack(NackData::decode(source)?),
            MESSAGE_ID_PING => Self::Ping(PingData::decode(source)?),
            MESSAGE_ID_PONG => Self::Pong(PongData::decode(source)?),
            MESSAGE_ID_NAT_PUNCH_REQUEST => Self::NatPunchRequest(read_u32(source)?),
            MESSAGE_ID_NAT_PUNCH_REPLY => Self::NatPunchReply(NatPunchData::decode(source)?),
            other => {
                return Err(CodecError::InvalidTypeId {
                    what: "message type",
                    id: other,
                });
            }
        };
        trace!(message_type = message.name(), "decoded message payload");
        Ok(message)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.type_id());
        match self {
            Self::Handshake(data) => data.encode(target),
            Self::HandshakeAccept(data) => data.encode(target),
            Self::HandshakeReject | Self::GetNeighbors => {}
            Self::Neighbors(data) => data.encode(target),
            Self::GetBlocksInv(data) => data.encode(target),
            Self::BlocksInv(data) => data.encode(target),
            Self::GetPoxInv(data) => data.encode(target),
            Self::PoxInv(data) => data.encode(target),
            Self::BlocksAvailable(data) | Self::MicroblocksAvailable(data) => data.encode(target),
            Self::Transaction(tx) => tx.encode(target),
            Self::Nack(data) => data.encode(target),
            Self::Ping(data) => data.encode(target),
            Self::Pong(data) => data.encode(target),
            Self::NatPunchRequest(nonce) => target.put_u32(*nonce),
            Self::NatPunchReply(data) => data.encode(target),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::relay::NeighborAddress;
    use crate::types::Hash160;
    use std::net::Ipv4Addr;

    fn handshake() -> HandshakeData {
        HandshakeData {
            addrbytes: PeerAddress::from_ipv4(Ipv4Addr::new(127, 0, 0, 1)),
            port: DEFAULT_P2P_PORT,
            services: 0x0001,
            node_public_key: StacksPublicKeyBuffer([0x02; 33]),
            expire_block_height: 1_000,
            data_url: UrlString::new("http://127.0.0.1:20443").unwrap(),
        }
    }

    fn roundtrip(message: StacksMessageType) {
        let bytes = message.to_bytes();
        assert_eq!(bytes[0], message.type_id());
        assert_eq!(StacksMessageType::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn every_supported_type_roundtrips() {
        roundtrip(StacksMessageType::Handshake(handshake()));
        roundtrip(StacksMessageType::HandshakeAccept(HandshakeAcceptData {
            handshake: handshake(),
            heartbeat_interval: 60,
        }));
        roundtrip(StacksMessageType::HandshakeReject);
        roundtrip(StacksMessageType::GetNeighbors);
        roundtrip(StacksMessageType::Neighbors(NeighborsData {
            neighbors: vec![NeighborAddress {
                addrbytes: PeerAddress([7; 16]),
                port: 4000,
                public_key_hash: Hash160([9; 20]),
            }]
            .into(),
        }));
        roundtrip(StacksMessageType::GetBlocksInv(GetBlocksInv {
            consensus_hash: ConsensusHash([1; 20]),
            num_blocks: 32,
        }));
        roundtrip(StacksMessageType::BlocksInv(BlocksInvData {
            bitlen: 12,
            block_bitvec: vec![0xff, 0x0f],
            microblocks_bitvec: vec![0x01, 0x00],
        }));
        roundtrip(StacksMessageType::GetPoxInv(GetPoxInv {
            consensus_hash: ConsensusHash([2; 20]),
            num_cycles: 4,
        }));
        roundtrip(StacksMessageType::PoxInv(PoxInvData {
            bitlen: 4,
            pox_bitvec: vec![0b1010],
        }));
        roundtrip(StacksMessageType::BlocksAvailable(BlocksAvailableData {
            available: vec![(ConsensusHash([3; 20]), BurnchainHeaderHash([4; 32]))].into(),
        }));
        roundtrip(StacksMessageType::MicroblocksAvailable(BlocksAvailableData::default()));
        roundtrip(StacksMessageType::Nack(NackData { error_code: 3 }));
        roundtrip(StacksMessageType::Ping(PingData { nonce: 99 }));
        roundtrip(StacksMessageType::Pong(PongData { nonce: 99 }));
        roundtrip(StacksMessageType::NatPunchRequest(5));
        roundtrip(StacksMessageType::NatPunchReply(NatPunchData {
            addrbytes: PeerAddress::from_ipv4(Ipv4Addr::new(8, 8, 8, 8)),
            port: 20444,
            nonce: 5,
        }));
    }

    #[test]
    fn bodyless_messages_are_one_byte() {
        assert_eq!(StacksMessageType::GetNeighbors.to_bytes(), vec![MESSAGE_ID_GET_NEIGHBORS]);
        assert_eq!(
            StacksMessageType::HandshakeReject.to_bytes(),
            vec![MESSAGE_ID_HANDSHAKE_REJECT]
        );
    }

    #[test]
    fn ping_layout() {
        let bytes = StacksMessageType::Ping(PingData { nonce: 0x0102_0304 }).to_bytes();
        assert_eq!(bytes, vec![MESSAGE_ID_PING, 1, 2, 3, 4]);
    }

    #[test]
    fn block_messages_are_unsupported() {
        for id in [MESSAGE_ID_BLOCKS, MESSAGE_ID_MICROBLOCKS] {
            assert_eq!(
                StacksMessageType::from_bytes(&[id, 0, 0, 0, 0]),
                Err(CodecError::UnsupportedMessageType(id))
            );
        }
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        assert_eq!(
            StacksMessageType::from_bytes(&[19]),
            Err(CodecError::InvalidTypeId {
                what: "message type",
                id: 19
            })
        );
    }

    #[test]
    fn inventory_bits() {
        let inv = BlocksInvData {
            bitlen: 10,
            block_bitvec: vec![0b0000_0101, 0b0000_0010],
            microblocks_bitvec: vec![0, 0],
        };
        assert!(inv.has_block(0));
        assert!(!inv.has_block(1));
        assert!(inv.has_block(2));
        assert!(inv.has_block(9));
        assert!(!inv.has_block(10));
        assert!(!inv.has_microblocks(0));

        let pox = PoxInvData {
            bitlen: 3,
            pox_bitvec: vec![0b1111_1111],
        };
        assert!(pox.has_cycle(2));
        assert!(!pox.has_cycle(3));
    }

    #[test]
    fn pong_echoes_ping_nonce() {
        let ping = PingData { nonce: 1234 };
        assert_eq!(PongData::from_ping(&ping).nonce, 1234);
    }
}
