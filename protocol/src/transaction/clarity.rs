//! Clarity values as they appear in contract-call arguments and
//! non-fungible post-conditions.
//!
//! Every value starts with a 1-byte type id. Containers (responses,
//! optionals, lists, tuples) nest recursively; decoding is bounded by
//! [`MAX_CLARITY_DEPTH`] so a hostile peer cannot blow the stack.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{read_i128, read_prefixed_bytes, read_u128, read_u32, read_u8};
use crate::codec::{write_prefixed_bytes, CodecError, Encodeable};
use crate::config::*;
use crate::types::{ClarityName, PrincipalData};

/// A serialized Clarity value.
///
/// Nothing stops an in-memory value from nesting deeper than
/// [`MAX_CLARITY_DEPTH`], and such a value still encodes, but decoding
/// rejects it with [`CodecError::DepthExceeded`]. Check [`depth`] before
/// encoding values built from untrusted input.
///
/// [`depth`]: ClarityValue::depth
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    Bool(bool),
    Principal(PrincipalData),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    /// Entries in wire order. Canonical encodings sort by name; the codec
    /// preserves whatever order it was given.
    Tuple(Vec<(ClarityName, ClarityValue)>),
    StringAscii(Vec<u8>),
    StringUtf8(Vec<u8>),
}

impl ClarityValue {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Int(_) => CLARITY_TYPE_INT,
            Self::UInt(_) => CLARITY_TYPE_UINT,
            Self::Buffer(_) => CLARITY_TYPE_BUFFER,
            Self::Bool(true) => CLARITY_TYPE_BOOL_TRUE,
            Self::Bool(false) => CLARITY_TYPE_BOOL_FALSE,
            Self::Principal(p) => p.type_id(),
            Self::ResponseOk(_) => CLARITY_TYPE_RESPONSE_OK,
            Self::ResponseErr(_) => CLARITY_TYPE_RESPONSE_ERR,
            Self::OptionalNone => CLARITY_TYPE_OPTIONAL_NONE,
            Self::OptionalSome(_) => CLARITY_TYPE_OPTIONAL_SOME,
            Self::List(_) => CLARITY_TYPE_LIST,
            Self::Tuple(_) => CLARITY_TYPE_TUPLE,
            Self::StringAscii(_) => CLARITY_TYPE_STRING_ASCII,
            Self::StringUtf8(_) => CLARITY_TYPE_STRING_UTF8,
        }
    }

    /// Container levels below this value: 0 for atoms and empty containers.
    /// A value decodes only if this is at most [`MAX_CLARITY_DEPTH`].
    pub fn depth(&self) -> usize {
        match self {
            Self::ResponseOk(inner) | Self::ResponseErr(inner) | Self::OptionalSome(inner) => {
                1 + inner.depth()
            }
            Self::List(items) => items.iter().map(|v| 1 + v.depth()).max().unwrap_or(0),
            Self::Tuple(entries) => entries
                .iter()
                .map(|(_, v)| 1 + v.depth())
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn decode_at<B: Buf>(source: &mut B, depth: usize) -> Result<Self, CodecError> {
        if depth > MAX_CLARITY_DEPTH {
            return Err(CodecError::DepthExceeded(MAX_CLARITY_DEPTH));
        }
        let type_id = read_u8(source)?;
        let value = match type_id {
            CLARITY_TYPE_INT => Self::Int(read_i128(source)?),
            CLARITY_TYPE_UINT => Self::UInt(read_u128(source)?),
            CLARITY_TYPE_BUFFER => Self::Buffer(read_prefixed_bytes(source)?),
            CLARITY_TYPE_BOOL_TRUE => Self::Bool(true),
            CLARITY_TYPE_BOOL_FALSE => Self::Bool(false),
            CLARITY_TYPE_STANDARD_PRINCIPAL | CLARITY_TYPE_CONTRACT_PRINCIPAL => {
                Self::Principal(PrincipalData::decode_body(type_id, source)?)
            }
            CLARITY_TYPE_RESPONSE_OK => Self::ResponseOk(Box::new(Self::decode_at(source, depth + 1)?)),
            CLARITY_TYPE_RESPONSE_ERR => {
                Self::ResponseErr(Box::new(Self::decode_at(source, depth + 1)?))
            }
            CLARITY_TYPE_OPTIONAL_NONE => Self::OptionalNone,
            CLARITY_TYPE_OPTIONAL_SOME => {
                Self::OptionalSome(Box::new(Self::decode_at(source, depth + 1)?))
            }
            CLARITY_TYPE_LIST => {
                let len = read_u32(source)? as usize;
                let mut items = Vec::with_capacity(len.min(source.remaining()));
                for _ in 0..len {
                    items.push(Self::decode_at(source, depth + 1)?);
                }
                Self::List(items)
            }
            CLARITY_TYPE_TUPLE => {
                let len = read_u32(source)? as usize;
                let mut entries = Vec::with_capacity(len.min(source.remaining()));
                for _ in 0..len {
                    let name = ClarityName::decode(source)?;
                    let value = Self::decode_at(source, depth + 1)?;
                    entries.push((name, value));
                }
                Self::Tuple(entries)
            }
            CLARITY_TYPE_STRING_ASCII => Self::StringAscii(read_prefixed_bytes(source)?),
            CLARITY_TYPE_STRING_UTF8 => Self::StringUtf8(read_prefixed_bytes(source)?),
            id => {
                return Err(CodecError::InvalidTypeId {
                    what: "clarity value",
                    id,
                })
            }
        };
        Ok(value)
    }
}

impl Encodeable for ClarityValue {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        Self::decode_at(source, 0)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.type_id());
        match self {
            Self::Int(v) => target.put_i128(*v),
            Self::UInt(v) => target.put_u128(*v),
            Self::Buffer(bytes) | Self::StringAscii(bytes) | Self::StringUtf8(bytes) => {
                write_prefixed_bytes(target, bytes)
            }
            Self::Bool(_) | Self::OptionalNone => {}
            Self::Principal(p) => p.encode_body(target),
            Self::ResponseOk(inner) | Self::ResponseErr(inner) | Self::OptionalSome(inner) => {
                inner.encode(target)
            }
            Self::List(items) => {
                target.put_u32(items.len() as u32);
                for item in items {
                    item.encode(target);
                }
            }
            Self::Tuple(entries) => {
                target.put_u32(entries.len() as u32);
                for (name, value) in entries {
                    name.encode(target);
                    value.encode(target);
                }
            }
        }
    }
}
