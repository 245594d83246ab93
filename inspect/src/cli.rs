//! # CLI Interface
//!
//! Command-line structure for `stacks-p2p-inspect`, using `clap` derive.

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::logging::LogFormat;
use stacks_p2p::config::{NETWORK_ID_MAINNET, NETWORK_ID_TESTNET, PEER_VERSION_MAINNET};

/// Inspect Stacks peer-to-peer wire messages.
///
/// Decodes hex-encoded envelopes and transactions to JSON, builds and signs
/// ping envelopes, and checks envelope signatures.
#[derive(Parser, Debug)]
#[command(
    name = "stacks-p2p-inspect",
    about = "Decode, build and verify Stacks P2P messages",
    version,
    propagate_version = true
)]
pub struct InspectCli {
    /// Diagnostic output format on stderr.
    #[arg(long, global = true, env = "STACKS_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Raise codec diagnostics (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a hex-encoded message envelope and print it as JSON.
    DecodeEnvelope(HexInput),
    /// Decode a hex-encoded transaction and print it as JSON.
    DecodeTx(HexInput),
    /// Generate a fresh secp256k1 key pair.
    Keygen,
    /// Build and sign a ping envelope, printing its hex encoding.
    Ping(PingArgs),
    /// Check the signature on a hex-encoded envelope.
    Verify(VerifyArgs),
}

/// A single hex argument. Whitespace and a leading `0x` are ignored.
#[derive(Args, Debug)]
pub struct HexInput {
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Hex-encoded 32-byte private key (a trailing `01` compression flag is accepted).
    #[arg(long, env = "STACKS_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Network id: `mainnet`, `testnet`, or a number (decimal or 0x-hex).
    #[arg(long, env = "STACKS_NETWORK_ID", default_value = "mainnet", value_parser = parse_network_id)]
    pub network_id: u32,

    #[arg(long, default_value_t = PEER_VERSION_MAINNET)]
    pub peer_version: u32,

    /// Message sequence number.
    #[arg(long, default_value_t = 0)]
    pub seq: u32,

    #[arg(long, default_value_t = 0)]
    pub nonce: u32,

    #[arg(long, default_value_t = 0)]
    pub burn_block_height: u64,

    #[arg(long, default_value_t = 0)]
    pub burn_stable_block_height: u64,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    pub hex: String,

    /// Expected signer. When omitted, the recovered signer is printed.
    #[arg(long)]
    pub public_key: Option<String>,
}

/// Parses `mainnet`, `testnet`, decimal or `0x`-prefixed hex network ids.
pub fn parse_network_id(s: &str) -> Result<u32, String> {
    match s.to_lowercase().as_str() {
        "mainnet" => Ok(NETWORK_ID_MAINNET),
        "testnet" => Ok(NETWORK_ID_TESTNET),
        other => match other.strip_prefix("0x") {
            Some(hex_digits) => u32::from_str_radix(hex_digits, 16),
            None => other.parse::<u32>(),
        }
        .map_err(|e| format!("invalid network id {s:?}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        InspectCli::command().debug_assert();
    }

    #[test]
    fn network_id_forms() {
        assert_eq!(parse_network_id("mainnet"), Ok(NETWORK_ID_MAINNET));
        assert_eq!(parse_network_id("TESTNET"), Ok(NETWORK_ID_TESTNET));
        assert_eq!(parse_network_id("0xff000000"), Ok(0xff00_0000));
        assert_eq!(parse_network_id("42"), Ok(42));
        assert!(parse_network_id("devnet").is_err());
    }

    #[test]
    fn ping_args_parse() {
        let cli = InspectCli::try_parse_from([
            "stacks-p2p-inspect",
            "ping",
            "--private-key",
            "01",
            "--network-id",
            "testnet",
            "--nonce",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Ping(args) => {
                assert_eq!(args.network_id, NETWORK_ID_TESTNET);
                assert_eq!(args.nonce, 7);
                assert_eq!(args.seq, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_diagnostic_flags_follow_subcommand() {
        let cli = InspectCli::try_parse_from([
            "stacks-p2p-inspect",
            "keygen",
            "-vv",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
