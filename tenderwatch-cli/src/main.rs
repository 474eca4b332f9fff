//! Tenderwatch — manage tender followers and flags from the command line.
//!
//! # Usage
//!
//! ```text
//! tenderwatch config init --base-url <url> [--cookie <cookie>] [--user-id <id>]
//! tenderwatch config show
//! tenderwatch followers list <tender> [--json]
//! tenderwatch followers edit <tender> [--add <ids>] [--remove <ids>] [--dry-run]
//! tenderwatch favourite <tender> on|off
//! tenderwatch seen <tender> on|off
//! tenderwatch tag <tender> <name>
//! tenderwatch delete <tender> --yes
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{
    config::ConfigCommand,
    followers::FollowersCommand,
    tender::{DeleteArgs, FlagArgs, TagArgs},
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tenderwatch",
    version,
    about = "Manage tender followers, favourites and seen flags",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for values stored in `~/.tenderwatch/config.yaml`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Server base URL (e.g. https://tenders.example.org).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Raw Cookie header carrying the session and CSRF cookies.
    #[arg(long, global = true, value_name = "COOKIE")]
    pub cookie: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or inspect the client configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List or edit the followers of a tender.
    Followers {
        #[command(subcommand)]
        command: FollowersCommand,
    },

    /// Mark or unmark a tender as favourite.
    Favourite(FlagArgs),

    /// Mark or unmark a tender as seen by you.
    Seen(FlagArgs),

    /// Attach a tag to a tender.
    Tag(TagArgs),

    /// Delete a tender.
    Delete(DeleteArgs),
}

// ---------------------------------------------------------------------------
// Shared on/off argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse an on/off switch from CLI args.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchArg(pub bool);

impl FromStr for SwitchArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => Ok(Self(true)),
            "off" | "false" | "no" => Ok(Self(false)),
            other => Err(format!("unknown switch '{other}'; expected: on, off")),
        }
    }
}

impl fmt::Display for SwitchArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "on" } else { "off" })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let connection = cli.connection;
    match cli.command {
        Commands::Config { command } => commands::config::run(command, &connection),
        Commands::Followers { command } => commands::followers::run(command, &connection),
        Commands::Favourite(args) => args.run_favourite(&connection),
        Commands::Seen(args) => args.run_seen(&connection),
        Commands::Tag(args) => args.run(&connection),
        Commands::Delete(args) => args.run(&connection),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
