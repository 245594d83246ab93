//! Fixed-width byte newtypes used throughout the wire format.
//!
//! Each type is a plain `[u8; N]` on the wire (no length prefix) and a hex
//! string everywhere humans look at it: `Display`, `Debug` and serde.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{Buf, BufMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::cursor::read_array;
use crate::codec::{CodecError, Encodeable};

macro_rules! byte_array_newtype {
    ($(#[$attr:meta])* $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width of this type on the wire.
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let mut out = [0u8; $len];
                hex::decode_to_slice(s, &mut out)?;
                Ok(Self(out))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }

        impl Encodeable for $name {
            fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
                Ok(Self(read_array(source)?))
            }

            fn encode<B: BufMut>(&self, target: &mut B) {
                target.put_slice(&self.0);
            }
        }
    };
}

byte_array_newtype!(
    /// RIPEMD-160(SHA-256(x)), the 20-byte hash behind addresses and peer keys.
    Hash160,
    20
);

byte_array_newtype!(
    /// Identifies a burnchain fork's view of a Stacks block.
    ConsensusHash,
    20
);

byte_array_newtype!(
    /// Hash of a burnchain (Bitcoin) block header.
    BurnchainHeaderHash,
    32
);

byte_array_newtype!(
    /// Hash of a Stacks block or microblock header.
    BlockHeaderHash,
    32
);

byte_array_newtype!(
    /// A SHA-512/256 digest, e.g. a microblock's transaction merkle root.
    Sha512Trunc256Sum,
    32
);

byte_array_newtype!(
    /// A peer's IP address in IPv6 form; IPv4 peers use the `::ffff:a.b.c.d`
    /// mapped encoding.
    PeerAddress,
    16
);

byte_array_newtype!(
    /// The free-form memo attached to an STX token transfer.
    TokenTransferMemo,
    34
);

byte_array_newtype!(
    /// The 32 bytes a miner attaches to its coinbase transaction.
    CoinbasePayload,
    32
);

byte_array_newtype!(
    /// A compressed secp256k1 public key as carried in handshakes and
    /// multisig auth fields.
    StacksPublicKeyBuffer,
    33
);

byte_array_newtype!(
    /// A recoverable secp256k1 signature laid out as `[recovery_id, r, s]`.
    MessageSignature,
    65
);

impl MessageSignature {
    /// The all-zero placeholder carried by unsigned messages.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl PeerAddress {
    /// Encodes an IPv4 address in IPv4-mapped IPv6 form.
    pub fn from_ipv4(addr: Ipv4Addr) -> Self {
        Self(addr.to_ipv6_mapped().octets())
    }

    pub fn from_ip(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::from_ipv4(v4),
            IpAddr::V6(v6) => Self(v6.octets()),
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.0[..10].iter().all(|b| *b == 0) && self.0[10] == 0xff && self.0[11] == 0xff
    }

    pub fn to_ip(&self) -> IpAddr {
        if self.is_ipv4() {
            IpAddr::V4(Ipv4Addr::new(self.0[12], self.0[13], self.0[14], self.0[15]))
        } else {
            IpAddr::V6(Ipv6Addr::from(self.0))
        }
    }

    pub fn to_socket_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.to_ip(), port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_display_and_parse() {
        let h = Hash160([0xab; 20]);
        assert_eq!(h.to_string(), "ab".repeat(20));
        assert_eq!(Hash160::from_hex(&h.to_hex()).unwrap(), h);
    }

    #[test]
    fn from_hex_rejects_wrong_width() {
        assert!(Hash160::from_hex("abcd").is_err());
        assert!(ConsensusHash::from_hex("zz").is_err());
    }

    #[test]
    fn encodes_without_length_prefix() {
        let memo = TokenTransferMemo([7u8; 34]);
        let bytes = memo.to_bytes();
        assert_eq!(bytes.len(), TokenTransferMemo::LEN);
        assert_eq!(TokenTransferMemo::from_bytes(&bytes).unwrap(), memo);
    }

    #[test]
    fn short_source_is_underrun() {
        let err = MessageSignature::from_bytes(&[0u8; 64]).unwrap_err();
        assert_eq!(
            err,
            CodecError::Underrun {
                needed: 65,
                remaining: 64
            }
        );
    }

    #[test]
    fn empty_signature_is_all_zero() {
        assert!(MessageSignature::empty().is_empty());
        let mut sig = MessageSignature::empty();
        sig.0[64] = 1;
        assert!(!sig.is_empty());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let h = ConsensusHash([0x01; 20]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(20)));
        let back: ConsensusHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn peer_address_ipv4_mapping() {
        let addr = PeerAddress::from_ipv4(Ipv4Addr::new(127, 0, 0, 1));
        assert!(addr.is_ipv4());
        assert_eq!(
            addr.to_socket_addr(20444),
            "127.0.0.1:20444".parse::<SocketAddr>().unwrap()
        );

        let v6 = PeerAddress::from_ip("2001:db8::1".parse().unwrap());
        assert!(!v6.is_ipv4());
        assert_eq!(v6.to_ip(), "2001:db8::1".parse::<IpAddr>().unwrap());
    }
}
