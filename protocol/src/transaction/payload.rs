//! The five transaction payload shapes and the dispatch between them.
//!
//! A transaction carries its payload as a 1-byte type id followed by the
//! payload body. The body codecs live here; the type id itself is owned by
//! [`StacksTransaction`](super::StacksTransaction), which stores whatever
//! byte it read and writes it back verbatim.
//!
//! ## Dispatch
//!
//! | id     | payload          |
//! |--------|------------------|
//! | `0x00` | token transfer   |
//! | `0x01` | smart contract   |
//! | `0x02` | contract call    |
//! | `0x03` | poison microblock|
//! | other  | coinbase         |
//!
//! Any id outside `0x00..=0x03` decodes as a coinbase body. This matches
//! deployed peers byte for byte and is not an error.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::clarity::ClarityValue;
use crate::codec::cursor::{read_u16, read_u64, read_u8};
use crate::codec::{CodecError, Encodeable, MessageVec};
use crate::config::*;
use crate::types::{
    BlockHeaderHash, ClarityName, CoinbasePayload, ContractName, MessageSignature, PrincipalData,
    Sha512Trunc256Sum, StacksAddress, StacksString, TokenTransferMemo,
};

// ---------------------------------------------------------------------------
// Payload bodies
// ---------------------------------------------------------------------------

/// Move STX from the origin to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenTransferPayload {
    pub recipient: PrincipalData,
    pub amount: u64,
    pub memo: TokenTransferMemo,
}

impl Encodeable for TokenTransferPayload {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            recipient: PrincipalData::decode(source)?,
            amount: read_u64(source)?,
            memo: TokenTransferMemo::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.recipient.encode(target);
        target.put_u64(self.amount);
        self.memo.encode(target);
    }
}

/// Deploy a contract under the origin's address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmartContractPayload {
    pub name: ContractName,
    pub code_body: StacksString,
}

impl Encodeable for SmartContractPayload {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            name: ContractName::decode(source)?,
            code_body: StacksString::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.name.encode(target);
        self.code_body.encode(target);
    }
}

/// Call a public function on a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCallPayload {
    pub address: StacksAddress,
    pub contract_name: ContractName,
    pub function_name: ClarityName,
    pub function_args: MessageVec<ClarityValue>,
}

impl Encodeable for ContractCallPayload {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            address: StacksAddress::decode(source)?,
            contract_name: ContractName::decode(source)?,
            function_name: ClarityName::decode(source)?,
            function_args: MessageVec::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.address.encode(target);
        self.contract_name.encode(target);
        self.function_name.encode(target);
        self.function_args.encode(target);
    }
}

/// Header of a Stacks microblock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StacksMicroblockHeader {
    pub version: u8,
    pub sequence: u16,
    pub prev_block: BlockHeaderHash,
    pub tx_merkle_root: Sha512Trunc256Sum,
    pub signature: MessageSignature,
}

impl Encodeable for StacksMicroblockHeader {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            version: read_u8(source)?,
            sequence: read_u16(source)?,
            prev_block: BlockHeaderHash::decode(source)?,
            tx_merkle_root: Sha512Trunc256Sum::decode(source)?,
            signature: MessageSignature::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.version);
        target.put_u16(self.sequence);
        self.prev_block.encode(target);
        self.tx_merkle_root.encode(target);
        self.signature.encode(target);
    }
}

/// Evidence that a miner signed two conflicting microblocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoisonMicroblockPayload {
    pub header_1: StacksMicroblockHeader,
    pub header_2: StacksMicroblockHeader,
}

impl Encodeable for PoisonMicroblockPayload {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            header_1: StacksMicroblockHeader::decode(source)?,
            header_2: StacksMicroblockHeader::decode(source)?,
        })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        self.header_1.encode(target);
        self.header_2.encode(target);
    }
}

// ---------------------------------------------------------------------------
// TransactionPayload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionPayload {
    TokenTransfer(TokenTransferPayload),
    SmartContract(SmartContractPayload),
    ContractCall(ContractCallPayload),
    PoisonMicroblock(PoisonMicroblockPayload),
    Coinbase(CoinbasePayload),
}

impl TransactionPayload {
    /// The canonical type id for this variant.
    pub fn type_id(&self) -> u8 {
        match self {
            Self::TokenTransfer(_) => PAYLOAD_TYPE_TOKEN_TRANSFER,
            Self::SmartContract(_) => PAYLOAD_TYPE_SMART_CONTRACT,
            Self::ContractCall(_) => PAYLOAD_TYPE_CONTRACT_CALL,
            Self::PoisonMicroblock(_) => PAYLOAD_TYPE_POISON_MICROBLOCK,
            Self::Coinbase(_) => PAYLOAD_TYPE_COINBASE,
        }
    }

    /// Decodes the payload body selected by an already-read type id.
    pub fn decode_with_type_id<B: Buf>(type_id: u8, source: &mut B) -> Result<Self, CodecError> {
        let payload = match type_id {
            PAYLOAD_TYPE_TOKEN_TRANSFER => Self::TokenTransfer(TokenTransferPayload::decode(source)?),
            PAYLOAD_TYPE_SMART_CONTRACT => Self::SmartContract(SmartContractPayload::decode(source)?),
            PAYLOAD_TYPE_CONTRACT_CALL => Self::ContractCall(ContractCallPayload::decode(source)?),
            PAYLOAD_TYPE_POISON_MICROBLOCK => {
                Self::PoisonMicroblock(PoisonMicroblockPayload::decode(source)?)
            }
            other => {
                if other != PAYLOAD_TYPE_COINBASE {
                    trace!(payload_type_id = other, "unrecognized payload type, decoding as coinbase");
                }
                Self::Coinbase(CoinbasePayload::decode(source)?)
            }
        };
        Ok(payload)
    }

    /// Appends the payload body. The type id is not written.
    pub fn encode<B: BufMut>(&self, target: &mut B) {
        match self {
            Self::TokenTransfer(p) => p.encode(target),
            Self::SmartContract(p) => p.encode(target),
            Self::ContractCall(p) => p.encode(target),
            Self::PoisonMicroblock(p) => p.encode(target),
            Self::Coinbase(p) => p.encode(target),
        }
    }
}
