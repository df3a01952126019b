pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::lists::ListKind;
use crate::core::config::AppConfig;
use crate::core::heatmap::SliceBy;
use crate::core::market::HistoryRange;
use crate::core::sentiment::LexiconAnalyzer;
use crate::providers::{Cached, MarketCaches, NseProvider, YahooFinanceProvider};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands that talk to the market data providers.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    History {
        symbol: String,
        range: HistoryRange,
        rows: usize,
        csv: Option<PathBuf>,
    },
    Info {
        symbol: String,
        news: usize,
        /// Also download financials, statements and dividends as CSV here
        export_dir: Option<PathBuf>,
    },
    Heatmap {
        index: String,
        slice: SliceBy,
    },
    List(ListKind),
    Indices,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("MarketSage starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // One set of caches shared by every provider for the whole run
    let caches = MarketCaches::new();
    let timeout = config.http.timeout();

    let nse = Cached::new(
        NseProvider::new(
            &config.providers.nse.base_url,
            &config.providers.nse.archives_url,
            timeout,
        )?,
        caches.clone(),
        config.cache.clone(),
    );
    let yahoo = Cached::new(
        YahooFinanceProvider::new(
            &config.providers.yahoo.base_url,
            &config.providers.yahoo.cookie_url,
            timeout,
        )?,
        caches,
        config.cache.clone(),
    );

    match command {
        AppCommand::History {
            symbol,
            range,
            rows,
            csv,
        } => cli::history::run(&yahoo, &symbol, range, rows, csv.as_deref()).await,
        AppCommand::Info {
            symbol,
            news,
            export_dir,
        } => {
            let analyzer = LexiconAnalyzer::new(&config.sentiment.lexicon);
            cli::info::run(&yahoo, &nse, &analyzer, &symbol, news).await?;
            match export_dir {
                Some(dir) => cli::export::run(&yahoo, &symbol, &dir).await,
                None => Ok(()),
            }
        }
        AppCommand::Heatmap { index, slice } => cli::heatmap::run(&nse, &index, slice).await,
        AppCommand::List(kind) => cli::lists::run(&nse, kind).await,
        AppCommand::Indices => {
            cli::heatmap::list_indices();
            Ok(())
        }
    }
}
