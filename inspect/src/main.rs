// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Stacks P2P Inspector
//!
//! Entry point for the `stacks-p2p-inspect` binary.
//!
//! - `decode-envelope` — hex envelope to JSON
//! - `decode-tx`       — hex transaction to JSON
//! - `keygen`          — fresh key pair
//! - `ping`            — build and sign a ping envelope
//! - `verify`          — check or recover an envelope's signer

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;

use stacks_p2p::codec::Encodeable;
use stacks_p2p::config;
use stacks_p2p::crypto::{StacksPrivateKey, StacksPublicKey};
use stacks_p2p::message::{PingData, StacksMessageEnvelope, StacksMessageType};
use stacks_p2p::transaction::StacksTransaction;
use stacks_p2p::types::BurnchainHeaderHash;

use cli::{Commands, InspectCli};

fn main() -> Result<()> {
    let cli = InspectCli::parse();
    logging::init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::DecodeEnvelope(input) => decode_envelope(&input.hex),
        Commands::DecodeTx(input) => decode_transaction(&input.hex),
        Commands::Keygen => keygen(),
        Commands::Ping(args) => build_ping(args),
        Commands::Verify(args) => verify_envelope(args),
    }
}

/// Strips whitespace and an optional `0x` prefix, then hex-decodes.
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix("0x").unwrap_or(&compact);
    hex::decode(digits).context("input is not valid hex")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

fn decode_envelope(input: &str) -> Result<()> {
    let bytes = parse_hex(input)?;
    let envelope =
        StacksMessageEnvelope::from_bytes(&bytes).context("failed to decode message envelope")?;

    tracing::info!(
        network = %config::network_name(envelope.preamble.network_id),
        message_type = envelope.payload.name(),
        relayers = envelope.relayers.len(),
        bytes = bytes.len(),
        "decoded envelope"
    );
    print_json(&envelope)
}

fn decode_transaction(input: &str) -> Result<()> {
    let bytes = parse_hex(input)?;
    let tx = StacksTransaction::from_bytes(&bytes).context("failed to decode transaction")?;

    if !tx.has_consistent_payload_type() {
        tracing::warn!(
            payload_type_id = tx.payload_type_id,
            "payload type id does not match payload"
        );
    }
    print_json(&json!({
        "txid": tx.txid_hex(),
        "transaction": tx,
    }))
}

fn keygen() -> Result<()> {
    let key = StacksPrivateKey::generate();
    let public_key = key.public_key();
    tracing::info!(public_key = %public_key, "generated key pair");

    print_json(&json!({
        "private_key": key.to_hex(),
        "public_key": public_key.to_hex(),
        "public_key_hash": public_key.hash160().to_hex(),
    }))
}

fn build_ping(args: cli::PingArgs) -> Result<()> {
    let key = StacksPrivateKey::from_hex(&args.private_key).context("invalid private key")?;

    let mut envelope = StacksMessageEnvelope::new(
        args.peer_version,
        args.network_id,
        args.seq,
        args.burn_block_height,
        BurnchainHeaderHash::default(),
        args.burn_stable_block_height,
        BurnchainHeaderHash::default(),
        StacksMessageType::Ping(PingData { nonce: args.nonce }),
    );
    envelope.sign(&key).context("failed to sign envelope")?;

    tracing::info!(
        network = %config::network_name(args.network_id),
        seq = args.seq,
        nonce = args.nonce,
        payload_len = envelope.preamble.payload_len,
        "built ping"
    );
    println!("{}", hex::encode(envelope.to_bytes()));
    Ok(())
}

fn verify_envelope(args: cli::VerifyArgs) -> Result<()> {
    let bytes = parse_hex(&args.hex)?;
    let envelope =
        StacksMessageEnvelope::from_bytes(&bytes).context("failed to decode message envelope")?;

    match args.public_key {
        Some(expected) => {
            let public_key = StacksPublicKey::from_hex(&expected).context("invalid public key")?;
            if let Err(e) = envelope.verify(&public_key) {
                bail!("verification failed: {e}");
            }
            tracing::info!(public_key = %public_key, "signature valid");
            print_json(&json!({ "valid": true, "signer": public_key.to_hex() }))
        }
        None => {
            let signer = envelope
                .recover_signer()
                .context("failed to recover signer")?;
            print_json(&json!({
                "signer": signer.to_hex(),
                "signer_hash": signer.hash160().to_hex(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input_is_normalised() {
        assert_eq!(parse_hex("0x0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(parse_hex(" 0a 0b\n").unwrap(), vec![0x0a, 0x0b]);
        assert!(parse_hex("zz").is_err());
    }
}
