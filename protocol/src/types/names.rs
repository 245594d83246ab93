//! Length-prefixed names and strings.
//!
//! Four string shapes appear on the wire. They differ in prefix width and
//! in which characters they admit, and every one of them is validated on
//! construction *and* on decode, so an instance in memory always has a
//! canonical encoding.
//!
//! | type           | prefix | max len | charset                             |
//! |----------------|--------|---------|-------------------------------------|
//! | `ClarityName`  | u8     | 128     | Clarity identifier                  |
//! | `ContractName` | u8     | 128     | `[a-zA-Z][a-zA-Z0-9_-]*`            |
//! | `StacksString` | u32    | —       | printable ASCII, `\t`, `\n`         |
//! | `UrlString`    | u8     | 255     | printable ASCII                     |

use std::fmt;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{read_bytes, read_u32, read_u8};
use crate::codec::{CodecError, Encodeable};
use crate::config::{MAX_CLARITY_NAME_LEN, MAX_CONTRACT_NAME_LEN};

fn invalid(what: &'static str, reason: impl Into<String>) -> CodecError {
    CodecError::InvalidString {
        what,
        reason: reason.into(),
    }
}

fn ascii_from_bytes(what: &'static str, bytes: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|_| invalid(what, "not valid ASCII"))
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

// ---------------------------------------------------------------------------
// ClarityName
// ---------------------------------------------------------------------------

/// A Clarity identifier: function names, asset names, tuple keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClarityName(String);

impl ClarityName {
    pub fn new(name: impl Into<String>) -> Result<Self, CodecError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), CodecError> {
        const WHAT: &str = "clarity name";
        if name.is_empty() || name.len() > MAX_CLARITY_NAME_LEN {
            return Err(invalid(WHAT, format!("length {} out of range", name.len())));
        }
        // Single-symbol operator names are legal on their own.
        if matches!(name, "-" | "+" | "=" | "/" | "*" | "<" | ">" | "<=" | ">=") {
            return Ok(());
        }
        let mut chars = name.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(WHAT, format!("{name:?} must start with a letter")));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || "-_!?+<>=/*".contains(c)) {
            return Err(invalid(WHAT, format!("{name:?} contains an illegal character")));
        }
        Ok(())
    }
}

impl TryFrom<String> for ClarityName {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClarityName> for String {
    fn from(name: ClarityName) -> Self {
        name.0
    }
}

impl fmt::Display for ClarityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encodeable for ClarityName {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let len = read_u8(source)? as usize;
        let name = ascii_from_bytes("clarity name", read_bytes(source, len)?)?;
        Self::new(name)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.0.len() as u8);
        target.put_slice(self.0.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// ContractName
// ---------------------------------------------------------------------------

/// The name half of a contract identifier (`SP000...ADDR.contract-name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractName(String);

impl ContractName {
    pub fn new(name: impl Into<String>) -> Result<Self, CodecError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), CodecError> {
        const WHAT: &str = "contract name";
        if name == "__transient" {
            return Ok(());
        }
        if name.is_empty() || name.len() > MAX_CONTRACT_NAME_LEN {
            return Err(invalid(WHAT, format!("length {} out of range", name.len())));
        }
        let mut chars = name.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(WHAT, format!("{name:?} must start with a letter")));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(invalid(WHAT, format!("{name:?} contains an illegal character")));
        }
        Ok(())
    }
}

impl TryFrom<String> for ContractName {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContractName> for String {
    fn from(name: ContractName) -> Self {
        name.0
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encodeable for ContractName {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let len = read_u8(source)? as usize;
        let name = ascii_from_bytes("contract name", read_bytes(source, len)?)?;
        Self::new(name)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.0.len() as u8);
        target.put_slice(self.0.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// StacksString
// ---------------------------------------------------------------------------

/// Source text of a smart contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StacksString(String);

impl StacksString {
    pub fn new(text: impl Into<String>) -> Result<Self, CodecError> {
        let text = text.into();
        if let Some(bad) = text
            .chars()
            .find(|c| !(is_printable_ascii(*c) || *c == '\t' || *c == '\n'))
        {
            return Err(invalid(
                "stacks string",
                format!("illegal character {:?}", bad),
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for StacksString {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StacksString> for String {
    fn from(s: StacksString) -> Self {
        s.0
    }
}

impl Encodeable for StacksString {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let len = read_u32(source)? as usize;
        let text = ascii_from_bytes("stacks string", read_bytes(source, len)?)?;
        Self::new(text)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u32(self.0.len() as u32);
        target.put_slice(self.0.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// UrlString
// ---------------------------------------------------------------------------

/// The data URL a peer advertises in its handshake. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlString(String);

impl UrlString {
    pub fn new(url: impl Into<String>) -> Result<Self, CodecError> {
        let url = url.into();
        if url.len() > u8::MAX as usize {
            return Err(invalid("url", format!("length {} exceeds 255", url.len())));
        }
        if !url.chars().all(is_printable_ascii) {
            return Err(invalid("url", "non-printable character"));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UrlString {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrlString> for String {
    fn from(url: UrlString) -> Self {
        url.0
    }
}

impl Encodeable for UrlString {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let len = read_u8(source)? as usize;
        let url = ascii_from_bytes("url", read_bytes(source, len)?)?;
        Self::new(url)
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u8(self.0.len() as u8);
        target.put_slice(self.0.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clarity_name_rules() {
        assert!(ClarityName::new("transfer").is_ok());
        assert!(ClarityName::new("get-balance?").is_ok());
        assert!(ClarityName::new("<=").is_ok());
        assert!(ClarityName::new("").is_err());
        assert!(ClarityName::new("1abc").is_err());
        assert!(ClarityName::new("has space").is_err());
        assert!(ClarityName::new("a".repeat(129)).is_err());
    }

    #[test]
    fn contract_name_rules() {
        assert!(ContractName::new("pox-4").is_ok());
        assert!(ContractName::new("my_token").is_ok());
        assert!(ContractName::new("__transient").is_ok());
        assert!(ContractName::new("bad!").is_err());
        assert!(ContractName::new("-leading").is_err());
    }

    #[test]
    fn clarity_name_wire_form() {
        let name = ClarityName::new("stx").unwrap();
        assert_eq!(name.to_bytes(), vec![3, b's', b't', b'x']);
        assert_eq!(ClarityName::from_bytes(&[3, b's', b't', b'x']).unwrap(), name);
    }

    #[test]
    fn decode_applies_charset_rules() {
        let err = ContractName::from_bytes(&[2, b'a', b'.']).unwrap_err();
        assert!(matches!(err, CodecError::InvalidString { what: "contract name", .. }));
    }

    #[test]
    fn stacks_string_uses_four_byte_prefix() {
        let code = StacksString::new("(define-data-var x int 0)\n").unwrap();
        let bytes = code.to_bytes();
        assert_eq!(&bytes[..4], &(code.len() as u32).to_be_bytes());
        assert_eq!(StacksString::from_bytes(&bytes).unwrap(), code);
    }

    #[test]
    fn stacks_string_rejects_control_characters() {
        assert!(StacksString::new("ok\tfine\n").is_ok());
        assert!(StacksString::new("bell\u{7}").is_err());
        assert!(StacksString::new("caf\u{e9}").is_err());
    }

    #[test]
    fn url_string_bounds() {
        assert!(UrlString::new("").is_ok());
        assert!(UrlString::new("http://127.0.0.1:20443").is_ok());
        assert!(UrlString::new("x".repeat(256)).is_err());
    }

    #[test]
    fn names_deserialize_through_validation() {
        let ok: ClarityName = serde_json::from_str("\"amount\"").unwrap();
        assert_eq!(ok.as_str(), "amount");
        assert!(serde_json::from_str::<ClarityName>("\"9lives\"").is_err());
    }
}
