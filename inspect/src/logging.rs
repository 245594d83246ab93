//! Diagnostics for the inspector.
//!
//! Decoded messages are the command output and go to stdout; every
//! diagnostic event goes to stderr. `-v` raises the codec's verbosity so a
//! rejected envelope can be traced field by field, and `RUST_LOG` replaces
//! the computed filter entirely.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Shape of diagnostic lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines, colored when stderr is a terminal.
    Pretty,
    /// Newline-delimited JSON events.
    Json,
}

/// Filter directives for a `-v` count.
///
/// The library logs every decoded payload at `trace` and every signing
/// at `debug`, so the quiet default keeps it at `warn`.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "stacks_p2p=warn,stacks_p2p_inspect=info",
        1 => "stacks_p2p=debug,stacks_p2p_inspect=debug",
        _ => "stacks_p2p=trace,stacks_p2p_inspect=trace",
    }
}

/// Installs the global subscriber. Must run before the first event.
pub fn init_logging(verbose: u8, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbose)));

    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal())
                    .with_line_number(verbose > 0),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(io::stderr).with_current_span(false)),
        ),
    };

    tracing_subscriber::registry().with(filter).with(pretty).with(json).init();

    tracing::debug!(?format, verbose, "diagnostics enabled");
}
