//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Samsara fleet-management connector CLI
#[derive(Parser, Debug)]
#[command(name = "samsara-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connector configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (overrides the config file and environment)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL override
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test credentials against the API
    Check,

    /// Execute operation requests and print one JSON item per line
    Run {
        /// File with one request object or an array of requests
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Inline request JSON (object or array)
        #[arg(long)]
        request_json: Option<String>,

        /// Emit an error-shaped item for failed requests instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// Register the webhook subscription and serve the inbound endpoint
    Serve {
        /// Trigger configuration file (YAML)
        #[arg(short, long)]
        trigger: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Skip subscription reconciliation on startup
        #[arg(long)]
        skip_register: bool,
    },
}
