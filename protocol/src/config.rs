//! # Protocol Configuration & Constants
//!
//! Every magic number the wire format depends on lives here. Discriminant
//! bytes, network identifiers, size limits: if a decoder compares against a
//! literal, the literal belongs in this file.
//!
//! These values are fixed by the Stacks network. Changing one does not
//! change the protocol, it just makes this crate stop talking to it.

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Peer protocol version advertised by mainnet nodes.
pub const PEER_VERSION_MAINNET: u32 = 0x1800_0000;

/// Peer protocol version advertised by testnet nodes.
pub const PEER_VERSION_TESTNET: u32 = 0xfaca_de01;

/// P2P network id carried in every mainnet preamble.
pub const NETWORK_ID_MAINNET: u32 = 0x1700_0000;

/// P2P network id carried in every testnet preamble.
pub const NETWORK_ID_TESTNET: u32 = 0xff00_0000;

/// Default P2P listening port.
pub const DEFAULT_P2P_PORT: u16 = 20444;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

pub const TX_VERSION_MAINNET: u8 = 0x00;
pub const TX_VERSION_TESTNET: u8 = 0x80;

pub const CHAIN_ID_MAINNET: u32 = 0x0000_0001;
pub const CHAIN_ID_TESTNET: u32 = 0x8000_0000;

/// The transaction must be included in an anchored block.
pub const ANCHOR_MODE_ON_CHAIN_ONLY: u8 = 0x01;
/// The transaction must be included in a microblock.
pub const ANCHOR_MODE_OFF_CHAIN_ONLY: u8 = 0x02;
/// Either is fine.
pub const ANCHOR_MODE_ANY: u8 = 0x03;

/// Assets not named by a post-condition may still change hands.
pub const POST_CONDITION_MODE_ALLOW: u8 = 0x01;
/// Only the listed asset movements are permitted.
pub const POST_CONDITION_MODE_DENY: u8 = 0x02;

pub const PAYLOAD_TYPE_TOKEN_TRANSFER: u8 = 0x00;
pub const PAYLOAD_TYPE_SMART_CONTRACT: u8 = 0x01;
pub const PAYLOAD_TYPE_CONTRACT_CALL: u8 = 0x02;
pub const PAYLOAD_TYPE_POISON_MICROBLOCK: u8 = 0x03;
pub const PAYLOAD_TYPE_COINBASE: u8 = 0x04;

pub const AUTH_TYPE_STANDARD: u8 = 0x04;
pub const AUTH_TYPE_SPONSORED: u8 = 0x05;

pub const HASH_MODE_P2PKH: u8 = 0x00;
pub const HASH_MODE_P2SH: u8 = 0x01;
pub const HASH_MODE_P2WPKH: u8 = 0x02;
pub const HASH_MODE_P2WSH: u8 = 0x03;

pub const KEY_ENCODING_COMPRESSED: u8 = 0x00;
pub const KEY_ENCODING_UNCOMPRESSED: u8 = 0x01;

pub const AUTH_FIELD_PUBLIC_KEY_COMPRESSED: u8 = 0x00;
pub const AUTH_FIELD_PUBLIC_KEY_UNCOMPRESSED: u8 = 0x01;
pub const AUTH_FIELD_SIGNATURE_COMPRESSED: u8 = 0x02;
pub const AUTH_FIELD_SIGNATURE_UNCOMPRESSED: u8 = 0x03;

pub const POST_CONDITION_TYPE_STX: u8 = 0x00;
pub const POST_CONDITION_TYPE_FUNGIBLE: u8 = 0x01;
pub const POST_CONDITION_TYPE_NON_FUNGIBLE: u8 = 0x02;

pub const POST_CONDITION_PRINCIPAL_ORIGIN: u8 = 0x01;
pub const POST_CONDITION_PRINCIPAL_STANDARD: u8 = 0x02;
pub const POST_CONDITION_PRINCIPAL_CONTRACT: u8 = 0x03;

pub const FUNGIBLE_CONDITION_SENT_EQ: u8 = 0x01;
pub const FUNGIBLE_CONDITION_SENT_GT: u8 = 0x02;
pub const FUNGIBLE_CONDITION_SENT_GE: u8 = 0x03;
pub const FUNGIBLE_CONDITION_SENT_LT: u8 = 0x04;
pub const FUNGIBLE_CONDITION_SENT_LE: u8 = 0x05;

pub const NON_FUNGIBLE_CONDITION_SENT: u8 = 0x10;
pub const NON_FUNGIBLE_CONDITION_NOT_SENT: u8 = 0x11;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

pub const ADDRESS_VERSION_MAINNET_SINGLESIG: u8 = 22;
pub const ADDRESS_VERSION_MAINNET_MULTISIG: u8 = 20;
pub const ADDRESS_VERSION_TESTNET_SINGLESIG: u8 = 26;
pub const ADDRESS_VERSION_TESTNET_MULTISIG: u8 = 21;

// ---------------------------------------------------------------------------
// Clarity Values
// ---------------------------------------------------------------------------

pub const CLARITY_TYPE_INT: u8 = 0x00;
pub const CLARITY_TYPE_UINT: u8 = 0x01;
pub const CLARITY_TYPE_BUFFER: u8 = 0x02;
pub const CLARITY_TYPE_BOOL_TRUE: u8 = 0x03;
pub const CLARITY_TYPE_BOOL_FALSE: u8 = 0x04;
pub const CLARITY_TYPE_STANDARD_PRINCIPAL: u8 = 0x05;
pub const CLARITY_TYPE_CONTRACT_PRINCIPAL: u8 = 0x06;
pub const CLARITY_TYPE_RESPONSE_OK: u8 = 0x07;
pub const CLARITY_TYPE_RESPONSE_ERR: u8 = 0x08;
pub const CLARITY_TYPE_OPTIONAL_NONE: u8 = 0x09;
pub const CLARITY_TYPE_OPTIONAL_SOME: u8 = 0x0a;
pub const CLARITY_TYPE_LIST: u8 = 0x0b;
pub const CLARITY_TYPE_TUPLE: u8 = 0x0c;
pub const CLARITY_TYPE_STRING_ASCII: u8 = 0x0d;
pub const CLARITY_TYPE_STRING_UTF8: u8 = 0x0e;

/// Deepest nesting of lists, tuples, optionals and responses a decoder
/// will follow. Bounds recursion on hostile input.
pub const MAX_CLARITY_DEPTH: usize = 32;

/// Longest Clarity identifier, in bytes.
pub const MAX_CLARITY_NAME_LEN: usize = 128;

/// Longest contract name accepted off the wire, in bytes.
pub const MAX_CONTRACT_NAME_LEN: usize = 128;

// ---------------------------------------------------------------------------
// P2P Messages
// ---------------------------------------------------------------------------

pub const MESSAGE_ID_HANDSHAKE: u8 = 0;
pub const MESSAGE_ID_HANDSHAKE_ACCEPT: u8 = 1;
pub const MESSAGE_ID_HANDSHAKE_REJECT: u8 = 2;
pub const MESSAGE_ID_GET_NEIGHBORS: u8 = 3;
pub const MESSAGE_ID_NEIGHBORS: u8 = 4;
pub const MESSAGE_ID_GET_BLOCKS_INV: u8 = 5;
pub const MESSAGE_ID_BLOCKS_INV: u8 = 6;
pub const MESSAGE_ID_GET_POX_INV: u8 = 7;
pub const MESSAGE_ID_POX_INV: u8 = 8;
pub const MESSAGE_ID_BLOCKS_AVAILABLE: u8 = 9;
pub const MESSAGE_ID_MICROBLOCKS_AVAILABLE: u8 = 10;
pub const MESSAGE_ID_BLOCKS: u8 = 11;
pub const MESSAGE_ID_MICROBLOCKS: u8 = 12;
pub const MESSAGE_ID_TRANSACTION: u8 = 13;
pub const MESSAGE_ID_NACK: u8 = 14;
pub const MESSAGE_ID_PING: u8 = 15;
pub const MESSAGE_ID_PONG: u8 = 16;
pub const MESSAGE_ID_NAT_PUNCH_REQUEST: u8 = 17;
pub const MESSAGE_ID_NAT_PUNCH_REPLY: u8 = 18;

/// Encoded size of a preamble: four u32s, two u64s, two 32-byte hashes,
/// a u32, the 65-byte signature and the u32 payload length.
pub const PREAMBLE_ENCODED_SIZE: usize = 165;

/// Largest relayers-plus-payload body a signed message may carry.
pub const MAX_PAYLOAD_LEN: usize = 1 + 16 * 1024 * 1024;

/// Longest relay path a node will forward.
pub const MAX_RELAYERS_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns a friendly name for a P2P network id, mainly for logging.
pub fn network_name(network_id: u32) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        other => format!("unknown(0x{:08x})", other),
    }
}

/// Returns the transaction version byte paired with a chain id.
pub fn tx_version_for_chain(chain_id: u32) -> Option<u8> {
    match chain_id {
        CHAIN_ID_MAINNET => Some(TX_VERSION_MAINNET),
        CHAIN_ID_TESTNET => Some(TX_VERSION_TESTNET),
        _ => None,
    }
}
