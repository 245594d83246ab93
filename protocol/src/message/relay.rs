//! Neighbor addresses and relay-path entries.

use std::net::SocketAddr;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{read_u16, read_u32};
use crate::codec::{CodecError, Encodeable, MessageVec};
use crate::crypto::StacksPublicKey;
use crate::types::{Hash160, PeerAddress};

/// A peer's address and the Hash160 of its node public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborAddress {
    pub addrbytes: PeerAddress,
    pub port: u16,
    pub public_key_hash: Hash160,
}

impl NeighborAddress {
    pub fn new(addr: SocketAddr, public_key: &StacksPublicKey) -> Self {
        Self {
            addrbytes: PeerAddress::from_ip(addr.ip()),
            port: addr.port(),
            public_key_hash: public_key.hash160(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.addrbytes.to_socket_addr(self.port)
    }
}

impl Encodeable for NeighborAddress {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            addrbytes: PeerAddress::decode(source)?,
            port: read_u16(source)?,
            public_key_hash: Hash160::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.addrbytes.encode(target);
        target.put_u16(self.port);
        self.public_key_hash.encode(target);
    }
}

pub type NeighborAddressVec = MessageVec<NeighborAddress>;

/// One hop on a message's relay path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayData {
    pub peer: NeighborAddress,
    pub seq: u32,
}

impl Encodeable for RelayData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            peer: NeighborAddress::decode(source)?,
            seq: read_u32(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.peer.encode(target);
        target.put_u32(self.seq);
    }
}

pub type RelayDataVec = MessageVec<RelayData>;
