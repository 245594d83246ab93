//! Transaction authorization: who pays, who signs.
//!
//! A standard authorization carries one spending condition (the origin
//! pays its own fee); a sponsored one carries two (origin, then sponsor).
//! Each spending condition is either single-sig or multi-sig, selected by
//! its hash-mode byte.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{read_u16, read_u64, read_u8};
use crate::codec::{CodecError, Encodeable, MessageVec};
use crate::config::*;
use crate::types::{Hash160, MessageSignature, StacksPublicKeyBuffer};

// ---------------------------------------------------------------------------
// Hash modes and key encodings
// ---------------------------------------------------------------------------

/// How a single-sig signer's address is derived from its public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleSigHashMode {
    P2PKH,
    P2WPKH,
}

impl SingleSigHashMode {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::P2PKH => HASH_MODE_P2PKH,
            Self::P2WPKH => HASH_MODE_P2WPKH,
        }
    }
}

/// How a multi-sig signer's address is derived from its redeem script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiSigHashMode {
    P2SH,
    P2WSH,
}

impl MultiSigHashMode {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::P2SH => HASH_MODE_P2SH,
            Self::P2WSH => HASH_MODE_P2WSH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEncoding {
    Compressed,
    Uncompressed,
}

impl KeyEncoding {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Compressed => KEY_ENCODING_COMPRESSED,
            Self::Uncompressed => KEY_ENCODING_UNCOMPRESSED,
        }
    }

    fn from_u8(byte: u8) -> Result<Self, CodecError> {
        match byte {
            KEY_ENCODING_COMPRESSED => Ok(Self::Compressed),
            KEY_ENCODING_UNCOMPRESSED => Ok(Self::Uncompressed),
            id => Err(CodecError::InvalidTypeId {
                what: "key encoding",
                id,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionAuthField
// ---------------------------------------------------------------------------

/// One slot of a multi-sig spending condition: either a signature or, for
/// signers who did not sign, their public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionAuthField {
    PublicKey {
        encoding: KeyEncoding,
        key: StacksPublicKeyBuffer,
    },
    Signature {
        encoding: KeyEncoding,
        signature: MessageSignature,
    },
}

impl Encodeable for TransactionAuthField {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let field_id = read_u8(source)?;
        let field = match field_id {
            AUTH_FIELD_PUBLIC_KEY_COMPRESSED | AUTH_FIELD_PUBLIC_KEY_UNCOMPRESSED => {
                Self::PublicKey {
                    encoding: if field_id == AUTH_FIELD_PUBLIC_KEY_COMPRESSED {
                        KeyEncoding::Compressed
                    } else {
                        KeyEncoding::Uncompressed
                    },
                    key: StacksPublicKeyBuffer::decode(source)?,
                }
            }
            AUTH_FIELD_SIGNATURE_COMPRESSED | AUTH_FIELD_SIGNATURE_UNCOMPRESSED => {
                Self::Signature {
                    encoding: if field_id == AUTH_FIELD_SIGNATURE_COMPRESSED {
                        KeyEncoding::Compressed
                    } else {
                        KeyEncoding::Uncompressed
                    },
                    signature: MessageSignature::decode(source)?,
                }
            }
            id => {
                return Err(CodecError::InvalidTypeId {
                    what: "auth field",
                    id,
                })
            }
        };
        Ok(field)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::PublicKey { encoding, key } => {
                target.put_u8(match encoding {
                    KeyEncoding::Compressed => AUTH_FIELD_PUBLIC_KEY_COMPRESSED,
                    KeyEncoding::Uncompressed => AUTH_FIELD_PUBLIC_KEY_UNCOMPRESSED,
                });
                key.encode(target);
            }
            Self::Signature {
                encoding,
                signature,
            } => {
                target.put_u8(match encoding {
                    KeyEncoding::Compressed => AUTH_FIELD_SIGNATURE_COMPRESSED,
                    KeyEncoding::Uncompressed => AUTH_FIELD_SIGNATURE_UNCOMPRESSED,
                });
                signature.encode(target);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Spending conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SingleSigSpendingCondition {
    pub hash_mode: SingleSigHashMode,
    pub signer: Hash160,
    pub nonce: u64,
    pub tx_fee: u64,
    pub key_encoding: KeyEncoding,
    pub signature: MessageSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiSigSpendingCondition {
    pub hash_mode: MultiSigHashMode,
    pub signer: Hash160,
    pub nonce: u64,
    pub tx_fee: u64,
    pub fields: MessageVec<TransactionAuthField>,
    pub signatures_required: u16,
}

/// The account that authorizes (and pays for) a transaction.
///
/// Wire form: `hash_mode (1) ‖ signer (20) ‖ nonce (8) ‖ fee (8)` followed by
/// `key_encoding (1) ‖ signature (65)` for single-sig, or
/// `fields (vec) ‖ signatures_required (2)` for multi-sig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendingCondition {
    SingleSig(SingleSigSpendingCondition),
    MultiSig(MultiSigSpendingCondition),
}

impl SpendingCondition {
    /// An unsigned single-sig P2PKH condition: the usual starting point for
    /// a transaction that a wallet will sign later.
    pub fn new_singlesig_p2pkh(signer: Hash160, nonce: u64, tx_fee: u64) -> Self {
        Self::SingleSig(SingleSigSpendingCondition {
            hash_mode: SingleSigHashMode::P2PKH,
            signer,
            nonce,
            tx_fee,
            key_encoding: KeyEncoding::Compressed,
            signature: MessageSignature::empty(),
        })
    }

    pub fn nonce(&self) -> u64 {
        match self {
            Self::SingleSig(c) => c.nonce,
            Self::MultiSig(c) => c.nonce,
        }
    }

    pub fn tx_fee(&self) -> u64 {
        match self {
            Self::SingleSig(c) => c.tx_fee,
            Self::MultiSig(c) => c.tx_fee,
        }
    }

    pub fn signer(&self) -> Hash160 {
        match self {
            Self::SingleSig(c) => c.signer,
            Self::MultiSig(c) => c.signer,
        }
    }
}

impl Encodeable for SpendingCondition {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let hash_mode = read_u8(source)?;
        let signer = Hash160::decode(source)?;
        let nonce = read_u64(source)?;
        let tx_fee = read_u64(source)?;

        let condition = match hash_mode {
            HASH_MODE_P2PKH | HASH_MODE_P2WPKH => Self::SingleSig(SingleSigSpendingCondition {
                hash_mode: if hash_mode == HASH_MODE_P2PKH {
                    SingleSigHashMode::P2PKH
                } else {
                    SingleSigHashMode::P2WPKH
                },
                signer,
                nonce,
                tx_fee,
                key_encoding: KeyEncoding::from_u8(read_u8(source)?)?,
                signature: MessageSignature::decode(source)?,
            }),
            HASH_MODE_P2SH | HASH_MODE_P2WSH => Self::MultiSig(MultiSigSpendingCondition {
                hash_mode: if hash_mode == HASH_MODE_P2SH {
                    MultiSigHashMode::P2SH
                } else {
                    MultiSigHashMode::P2WSH
                },
                signer,
                nonce,
                tx_fee,
                fields: MessageVec::decode(source)?,
                signatures_required: read_u16(source)?,
            }),
            id => {
                return Err(CodecError::InvalidTypeId {
                    what: "hash mode",
                    id,
                })
            }
        };
        Ok(condition)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::SingleSig(c) => {
                target.put_u8(c.hash_mode.to_u8());
                c.signer.encode(target);
                target.put_u64(c.nonce);
                target.put_u64(c.tx_fee);
                target.put_u8(c.key_encoding.to_u8());
                c.signature.encode(target);
            }
            Self::MultiSig(c) => {
                target.put_u8(c.hash_mode.to_u8());
                c.signer.encode(target);
                target.put_u64(c.nonce);
                target.put_u64(c.tx_fee);
                c.fields.encode(target);
                target.put_u16(c.signatures_required);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionAuth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionAuth {
    Standard(SpendingCondition),
    Sponsored {
        origin: SpendingCondition,
        sponsor: SpendingCondition,
    },
}

impl TransactionAuth {
    pub fn origin(&self) -> &SpendingCondition {
        match self {
            Self::Standard(origin) | Self::Sponsored { origin, .. } => origin,
        }
    }

    pub fn sponsor(&self) -> Option<&SpendingCondition> {
        match self {
            Self::Standard(_) => None,
            Self::Sponsored { sponsor, .. } => Some(sponsor),
        }
    }

    pub fn is_sponsored(&self) -> bool {
        matches!(self, Self::Sponsored { .. })
    }
}

impl Encodeable for TransactionAuth {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        match read_u8(source)? {
            AUTH_TYPE_STANDARD => Ok(Self::Standard(SpendingCondition::decode(source)?)),
            AUTH_TYPE_SPONSORED => Ok(Self::Sponsored {
                origin: SpendingCondition::decode(source)?,
                sponsor: SpendingCondition::decode(source)?,
            }),
            id => Err(CodecError::InvalidTypeId {
                what: "authorization",
                id,
            }),
        }
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::Standard(origin) => {
                target.put_u8(AUTH_TYPE_STANDARD);
                origin.encode(target);
            }
            Self::Sponsored { origin, sponsor } => {
                target.put_u8(AUTH_TYPE_SPONSORED);
                origin.encode(target);
                sponsor.encode(target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multisig() -> SpendingCondition {
        SpendingCondition::MultiSig(MultiSigSpendingCondition {
            hash_mode: MultiSigHashMode::P2SH,
            signer: Hash160([0x22; 20]),
            nonce: 9,
            tx_fee: 1_000,
            fields: vec![
                TransactionAuthField::Signature {
                    encoding: KeyEncoding::Compressed,
                    signature: MessageSignature([0x01; 65]),
                },
                TransactionAuthField::PublicKey {
                    encoding: KeyEncoding::Compressed,
                    key: StacksPublicKeyBuffer([0x02; 33]),
                },
            ]
            .into(),
            signatures_required: 1,
        })
    }

    #[test]
    fn singlesig_standard_auth_layout() {
        let auth = TransactionAuth::Standard(SpendingCondition::new_singlesig_p2pkh(
            Hash160([0x11; 20]),
            5,
            180,
        ));
        let bytes = auth.to_bytes();
        // auth type + hash mode + signer + nonce + fee + key encoding + signature
        assert_eq!(bytes.len(), 1 + 1 + 20 + 8 + 8 + 1 + 65);
        assert_eq!(bytes[0], AUTH_TYPE_STANDARD);
        assert_eq!(bytes[1], HASH_MODE_P2PKH);
        assert_eq!(&bytes[22..30], &5u64.to_be_bytes());
        assert_eq!(TransactionAuth::from_bytes(&bytes).unwrap(), auth);
    }

    #[test]
    fn sponsored_multisig_roundtrip() {
        let auth = TransactionAuth::Sponsored {
            origin: SpendingCondition::new_singlesig_p2pkh(Hash160([0x11; 20]), 1, 0),
            sponsor: multisig(),
        };
        let decoded = TransactionAuth::from_bytes(&auth.to_bytes()).unwrap();
        assert!(decoded.is_sponsored());
        assert_eq!(decoded.sponsor().unwrap().tx_fee(), 1_000);
        assert_eq!(decoded, auth);
    }

    #[test]
    fn unknown_auth_type_is_rejected() {
        assert_eq!(
            TransactionAuth::from_bytes(&[0x06]).unwrap_err(),
            CodecError::InvalidTypeId {
                what: "authorization",
                id: 0x06
            }
        );
    }

    #[test]
    fn unknown_hash_mode_is_rejected() {
        let mut bytes = vec![AUTH_TYPE_STANDARD, 0x09];
        bytes.extend_from_slice(&[0u8; 36]);
        let err = TransactionAuth::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidTypeId {
                what: "hash mode",
                id: 0x09
            }
        );
    }

    #[test]
    fn unknown_auth_field_is_rejected() {
        // One field, with a bogus field id.
        let bytes = [0, 0, 0, 1, 0x07];
        let err = MessageVec::<TransactionAuthField>::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::InvalidTypeId { what: "auth field", .. }));
    }
}
