//! Post-conditions: assertions about what a transaction may move.
//!
//! Each post-condition names a principal, optionally an asset, and a
//! condition code. The codec carries condition codes as raw bytes; whether
//! a code makes sense for its post-condition type is a validation concern,
//! not a wire concern.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use super::clarity::ClarityValue;
use crate::codec::cursor::{read_u64, read_u8};
use crate::codec::{CodecError, Encodeable, MessageVec};
use crate::config::*;
use crate::types::{ClarityName, ContractName, StacksAddress};

/// Count-prefixed post-conditions in transaction order.
pub type PostConditionVec = MessageVec<TransactionPostCondition>;

/// Whose assets a post-condition constrains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostConditionPrincipal {
    /// The transaction's origin account, whatever its address.
    Origin,
    Standard(StacksAddress),
    Contract(StacksAddress, ContractName),
}

impl Encodeable for PostConditionPrincipal {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        match read_u8(source)? {
            POST_CONDITION_PRINCIPAL_ORIGIN => Ok(Self::Origin),
            POST_CONDITION_PRINCIPAL_STANDARD => Ok(Self::Standard(StacksAddress::decode(source)?)),
            POST_CONDITION_PRINCIPAL_CONTRACT => Ok(Self::Contract(
                StacksAddress::decode(source)?,
                ContractName::decode(source)?,
            )),
            id => Err(CodecError::InvalidTypeId {
                what: "post-condition principal",
                id,
            }),
        }
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::Origin => target.put_u8(POST_CONDITION_PRINCIPAL_ORIGIN),
            Self::Standard(address) => {
                target.put_u8(POST_CONDITION_PRINCIPAL_STANDARD);
                address.encode(target);
            }
            Self::Contract(address, name) => {
                target.put_u8(POST_CONDITION_PRINCIPAL_CONTRACT);
                address.encode(target);
                name.encode(target);
            }
        }
    }
}

/// Fully-qualified asset identifier: `address.contract::asset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetInfo {
    pub contract_address: StacksAddress,
    pub contract_name: ContractName,
    pub asset_name: ClarityName,
}

impl Encodeable for AssetInfo {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            contract_address: StacksAddress::decode(source)?,
            contract_name: ContractName::decode(source)?,
            asset_name: ClarityName::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.contract_address.encode(target);
        self.contract_name.encode(target);
        self.asset_name.encode(target);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionPostCondition {
    Stx {
        principal: PostConditionPrincipal,
        condition_code: u8,
        amount: u64,
    },
    Fungible {
        principal: PostConditionPrincipal,
        asset: AssetInfo,
        condition_code: u8,
        amount: u64,
    },
    NonFungible {
        principal: PostConditionPrincipal,
        asset: AssetInfo,
        asset_value: ClarityValue,
        condition_code: u8,
    },
}

impl TransactionPostCondition {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Stx { .. } => POST_CONDITION_TYPE_STX,
            Self::Fungible { .. } => POST_CONDITION_TYPE_FUNGIBLE,
            Self::NonFungible { .. } => POST_CONDITION_TYPE_NON_FUNGIBLE,
        }
    }
}

impl Encodeable for TransactionPostCondition {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        match read_u8(source)? {
            POST_CONDITION_TYPE_STX => Ok(Self::Stx {
                principal: PostConditionPrincipal::decode(source)?,
                condition_code: read_u8(source)?,
                amount: read_u64(source)?,
            }),
            POST_CONDITION_TYPE_FUNGIBLE => Ok(Self::Fungible {
                principal: PostConditionPrincipal::decode(source)?,
                asset: AssetInfo::decode(source)?,
                condition_code: read_u8(source)?,
                amount: read_u64(source)?,
            }),
            POST_CONDITION_TYPE_NON_FUNGIBLE => Ok(Self::NonFungible {
                principal: PostConditionPrincipal::decode(source)?,
                asset: AssetInfo::decode(source)?,
                asset_value: ClarityValue::decode(source)?,
                condition_code: read_u8(source)?,
            }),
            id => Err(CodecError::InvalidTypeId {
                what: "post-condition",
                id,
            }),
        }
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.type_id());
        match self {
            Self::Stx {
                principal,
                condition_code,
                amount,
            } => {
                principal.encode(target);
                target.put_u8(*condition_code);
                target.put_u64(*amount);
            }
            Self::Fungible {
                principal,
                asset,
                condition_code,
                amount,
            } => {
                principal.encode(target);
                asset.encode(target);
                target.put_u8(*condition_code);
                target.put_u64(*amount);
            }
            Self::NonFungible {
                principal,
                asset,
                asset_value,
                condition_code,
            } => {
                principal.encode(target);
                asset.encode(target);
                asset_value.encode(target);
                target.put_u8(*condition_code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash160;

    fn asset() -> AssetInfo {
        AssetInfo {
            contract_address: StacksAddress::new(22, Hash160([0x44; 20])),
            contract_name: ContractName::new("names").unwrap(),
            asset_name: ClarityName::new("name").unwrap(),
        }
    }

    #[test]
    fn stx_post_condition_layout() {
        let pc = TransactionPostCondition::Stx {
            principal: PostConditionPrincipal::Origin,
            condition_code: FUNGIBLE_CONDITION_SENT_LE,
            amount: 1_000_000,
        };
        let bytes = pc.to_bytes();
        assert_eq!(bytes.len(), 1 + 1 + 1 + 8);
        assert_eq!(&bytes[..3], &[0x00, 0x01, 0x05]);
        assert_eq!(TransactionPostCondition::from_bytes(&bytes).unwrap(), pc);
    }

    #[test]
    fn nft_post_condition_carries_clarity_value() {
        let pc = TransactionPostCondition::NonFungible {
            principal: PostConditionPrincipal::Contract(
                StacksAddress::new(20, Hash160([0x55; 20])),
                ContractName::new("vault").unwrap(),
            ),
            asset: asset(),
            asset_value: ClarityValue::Buffer(b"satoshi".to_vec()),
            condition_code: NON_FUNGIBLE_CONDITION_SENT,
        };
        let bytes = pc.to_bytes();
        assert_eq!(*bytes.last().unwrap(), NON_FUNGIBLE_CONDITION_SENT);
        assert_eq!(TransactionPostCondition::from_bytes(&bytes).unwrap(), pc);
    }

    #[test]
    fn post_condition_vec_preserves_order() {
        let pcs: PostConditionVec = vec![
            TransactionPostCondition::Fungible {
                principal: PostConditionPrincipal::Standard(StacksAddress::new(
                    22,
                    Hash160([1; 20]),
                )),
                asset: asset(),
                condition_code: FUNGIBLE_CONDITION_SENT_EQ,
                amount: 5,
            },
            TransactionPostCondition::Stx {
                principal: PostConditionPrincipal::Origin,
                condition_code: FUNGIBLE_CONDITION_SENT_GT,
                amount: 0,
            },
        ]
        .into();
        let decoded = PostConditionVec::from_bytes(&pcs.to_bytes()).unwrap();
        assert_eq!(decoded[0].type_id(), POST_CONDITION_TYPE_FUNGIBLE);
        assert_eq!(decoded[1].type_id(), POST_CONDITION_TYPE_STX);
        assert_eq!(decoded, pcs);
    }

    #[test]
    fn unknown_post_condition_type_is_rejected() {
        assert_eq!(
            TransactionPostCondition::from_bytes(&[0x03]).unwrap_err(),
            CodecError::InvalidTypeId {
                what: "post-condition",
                id: 0x03
            }
        );
    }

    #[test]
    fn unknown_principal_type_is_rejected() {
        let err = TransactionPostCondition::from_bytes(&[0x00, 0x04]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidTypeId {
                what: "post-condition principal",
                ..
            }
        ));
    }
}
