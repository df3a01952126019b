use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use marketsage::cli::lists::ListKind;
use marketsage::core::heatmap::SliceBy;
use marketsage::core::log::init_logging;
use marketsage::core::market::HistoryRange;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display daily price history for a stock
    History {
        /// NSE symbol, e.g. INFY
        symbol: String,
        /// Lookback window: 1mo, 6mo, 1y, 5y or max
        #[arg(short, long, default_value = "1y")]
        range: HistoryRange,
        /// Number of most recent sessions to show
        #[arg(long, default_value_t = 20)]
        rows: usize,
        /// Also write every bar to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Display company information, technicals and news sentiment
    Info {
        /// NSE symbol, e.g. INFY
        symbol: String,
        /// Number of news articles to analyse
        #[arg(short, long, default_value_t = 10)]
        news: usize,
        /// Download financials, income statement, balance sheet, cash flow
        /// and dividends as CSV files into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Display an index heatmap
    Heatmap {
        /// Index name, e.g. "NIFTY 50"
        index: String,
        /// Tile size: market-cap, gainers or losers
        #[arg(short, long, default_value = "market-cap")]
        slice: SliceBy,
    },
    /// Display a reference list: equity, nifty50 or industries
    List { kind: ListKind },
    /// List the supported index names
    Indices,
}

impl From<Commands> for marketsage::AppCommand {
    fn from(cmd: Commands) -> marketsage::AppCommand {
        match cmd {
            Commands::History {
                symbol,
                range,
                rows,
                csv,
            } => marketsage::AppCommand::History {
                symbol,
                range,
                rows,
                csv,
            },
            Commands::Info {
                symbol,
                news,
                export_dir,
            } => marketsage::AppCommand::Info {
                symbol,
                news,
                export_dir,
            },
            Commands::Heatmap { index, slice } => marketsage::AppCommand::Heatmap { index, slice },
            Commands::List { kind } => marketsage::AppCommand::List(kind),
            Commands::Indices => marketsage::AppCommand::Indices,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => marketsage::cli::setup::setup_at_path(path),
            None => marketsage::cli::setup::setup(),
        },
        Some(cmd) => marketsage::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
        eprintln!(
            "{}",
            marketsage::cli::ui::style_text(&format!("Error: {e:#}"), marketsage::cli::ui::StyleType::Error)
        );
        std::process::exit(1);
    }
    Ok(())
}
