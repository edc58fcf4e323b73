use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vos",
    about = "Versioned object store with optimistic concurrency and API-key authentication",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the object store server
    Serve(ServeArgs),
    /// Print the registry lookup hash of an API key
    KeyHash(KeyHashArgs),
    /// Validate a configuration file
    CheckConfig(CheckConfigArgs),
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct KeyHashArgs {
    /// The full token, e.g. vossa_<secret>_<checksum>
    pub token: String,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    pub file: PathBuf,
}
