//! barcache CLI - Gap-fill OHLCV bar cache.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::get::GetArgs;

#[derive(Parser)]
#[command(name = "barcache")]
#[command(about = "Gap-fill OHLCV bar cache: fetch only what is missing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Cache directory. Defaults to the platform data directory.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bars for a range, filling gaps from the origin
    Get(GetArgs),

    /// Show which parts of a range are not cached yet
    Gaps {
        /// Instrument as EXCHANGE:SYMBOL (e.g., GLOBEX:ES)
        instrument: String,

        /// Bar timeframe (m1, m5, m15, m30, h1, d1, w1, mn1)
        timeframe: String,

        /// Range start (epoch seconds, RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end, exclusive (epoch seconds, RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Print the recorded coverage of a bar set
    Coverage {
        /// Instrument as EXCHANGE:SYMBOL
        instrument: String,

        /// Bar timeframe
        timeframe: String,
    },

    /// List cached bar sets
    List,
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Get(args) => commands::get::get(args, cli.store, cli.quiet).await,
        Commands::Gaps {
            instrument,
            timeframe,
            from,
            to,
        } => commands::gaps::show_gaps(&instrument, &timeframe, &from, &to, cli.store).await,
        Commands::Coverage {
            instrument,
            timeframe,
        } => commands::coverage::show_coverage(&instrument, &timeframe, cli.store).await,
        Commands::List => commands::list::list_bar_sets(cli.store).await,
    }
}
