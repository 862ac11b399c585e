/// Command-line arguments for the copytrader binary
///
/// Subcommands are parsed with clap. Logger flags (`--debug-<tag>`,
/// `--debug-all`, `--verbose`, `--verbose-<tag>`, `--quiet`,
/// `--log-level=<level>`) may appear anywhere on the command line; they are
/// split off before clap sees the arguments and handed to `logger::init`.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "copytrader", version, about = "Track Solana wallet activity and perps positions")]
pub struct Cli {
    /// Base directory for config, data and logs
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the polling loop until ctrl-c (reads commands from stdin)
    Run {
        /// Start with automatic polling enabled
        #[arg(long)]
        enable: bool,
    },
    /// Manage tracked wallets
    Wallet {
        #[command(subcommand)]
        action: WalletCommand,
    },
    /// Print recent activity history
    Activities {
        /// Defaults to `fetcher.display_fetch_limit`
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run a single ingestion cycle
    PollOnce,
    /// Fetch and summarize perps positions of all wallets
    Positions,
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Delete wallets, settings and activity history
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum WalletCommand {
    Add {
        address: String,
        #[arg(long)]
        label: Option<String>,
    },
    Remove {
        address: String,
    },
    Label {
        address: String,
        label: String,
    },
    List,
    /// Merge wallets from an exported JSON file
    Import {
        path: PathBuf,
    },
    /// Write wallets as JSON (stdout when no file is given)
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SettingsCommand {
    Show,
    /// Poll interval in seconds (clamped to the configured range)
    Interval {
        seconds: u64,
    },
    /// RPC endpoint URL
    Rpc {
        endpoint: String,
        /// Probe the endpoint before saving it
        #[arg(long)]
        test: bool,
    },
}

// =============================================================================
// LOGGER FLAGS
// =============================================================================

/// Whether `arg` is consumed by the logger rather than clap
pub fn is_logger_flag(arg: &str) -> bool {
    arg == "--verbose"
        || arg == "--quiet"
        || arg.starts_with("--debug-")
        || arg.starts_with("--verbose-")
        || arg.starts_with("--log-level=")
}

/// Split raw process arguments into (clap arguments, logger flags)
///
/// The program name stays first in the clap list.
pub fn split_logger_flags(args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut cli = Vec::with_capacity(args.len());
    let mut logger = Vec::new();

    for (index, arg) in args.into_iter().enumerate() {
        if index > 0 && is_logger_flag(&arg) {
            logger.push(arg);
        } else {
            cli.push(arg);
        }
    }

    (cli, logger)
}
