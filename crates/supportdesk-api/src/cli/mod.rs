//! CLI argument definitions and command implementations.

pub mod chat;
pub mod session;
pub mod status;

use clap::{Parser, Subcommand};

/// Customer-support chat backend.
#[derive(Debug, Parser)]
#[command(name = "sdesk", version, about = "supportdesk - customer-support chat backend")]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Export spans via OpenTelemetry (stdout exporter)
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message to a session and print the reply
    Ask {
        /// Opaque session key (created implicitly on first message)
        session_id: String,

        /// The message to send
        query: String,
    },

    /// Print the transcript of a session
    History {
        /// Session key to read
        session_id: String,
    },

    /// List known sessions
    Sessions {
        /// Maximum number of sessions to list
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },

    /// Show configuration and storage status
    Status,
}
