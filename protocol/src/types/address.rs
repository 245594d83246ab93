//! Stacks addresses and principals.

use std::fmt;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use super::hashes::Hash160;
use super::names::ContractName;
use crate::codec::cursor::read_u8;
use crate::codec::{CodecError, Encodeable};
use crate::config::{CLARITY_TYPE_CONTRACT_PRINCIPAL, CLARITY_TYPE_STANDARD_PRINCIPAL};

/// A version byte plus the Hash160 of the owning key or script.
///
/// Wire form: `version (1) ‖ hash160 (20)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StacksAddress {
    pub version: u8,
    pub hash160: Hash160,
}

impl StacksAddress {
    pub fn new(version: u8, hash160: Hash160) -> Self {
        Self { version, hash160 }
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{}", self.version, self.hash160)
    }
}

impl Encodeable for StacksAddress {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let version = read_u8(source)?;
        let hash160 = Hash160::decode(source)?;
        Ok(Self { version, hash160 })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.version);
        self.hash160.encode(target);
    }
}

/// An account or contract that can own assets.
///
/// Encoded with its Clarity type prefix (`0x05` standard, `0x06` contract),
/// which is how it appears both inside Clarity values and as the recipient
/// of a token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalData {
    Standard(StacksAddress),
    Contract {
        issuer: StacksAddress,
        name: ContractName,
    },
}

impl PrincipalData {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Standard(_) => CLARITY_TYPE_STANDARD_PRINCIPAL,
            Self::Contract { .. } => CLARITY_TYPE_CONTRACT_PRINCIPAL,
        }
    }

    /// Decodes the body that follows an already-consumed type prefix.
    pub(crate) fn decode_body<B: Buf>(type_id: u8, source: &mut B) -> Result<Self, CodecError> {
        match type_id {
            CLARITY_TYPE_STANDARD_PRINCIPAL => Ok(Self::Standard(StacksAddress::decode(source)?)),
            CLARITY_TYPE_CONTRACT_PRINCIPAL => Ok(Self::Contract {
                issuer: StacksAddress::decode(source)?,
                name: ContractName::decode(source)?,
            }),
            id => Err(CodecError::InvalidTypeId {
                what: "principal",
                id,
            }),
        }
    }

    pub(crate) fn encode_body<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::Standard(address) => address.encode(target),
            Self::Contract { issuer, name } => {
                issuer.encode(target);
                name.encode(target);
            }
        }
    }
}

impl Encodeable for PrincipalData {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let type_id = read_u8(source)?;
        Self::decode_body(type_id, source)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.type_id());
        self.encode_body(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> StacksAddress {
        StacksAddress::new(22, Hash160([0x11; 20]))
    }

    #[test]
    fn address_is_twenty_one_bytes() {
        let bytes = addr().to_bytes();
        assert_eq!(bytes.len(), 21);
        assert_eq!(bytes[0], 22);
    }

    #[test]
    fn standard_principal_carries_type_prefix() {
        let p = PrincipalData::Standard(addr());
        let bytes = p.to_bytes();
        assert_eq!(bytes[0], 0x05);
        assert_eq!(PrincipalData::from_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn contract_principal_roundtrip() {
        let p = PrincipalData::Contract {
            issuer: addr(),
            name: ContractName::new("bns").unwrap(),
        };
        let bytes = p.to_bytes();
        assert_eq!(bytes[0], 0x06);
        assert_eq!(bytes.len(), 1 + 21 + 1 + 3);
        assert_eq!(PrincipalData::from_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn unknown_principal_prefix_is_rejected() {
        let err = PrincipalData::from_bytes(&[0x07]).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidTypeId {
                what: "principal",
                id: 0x07
            }
        );
    }
}
