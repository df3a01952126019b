//! Index breadth and heatmap tile selection.

use crate::core::market::IndexQuote;
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

/// Indices offered for the heatmap, in display order.
pub const INDEX_LIST: &[&str] = &[
    "NIFTY 50",
    "NIFTY NEXT 50",
    "NIFTY MIDCAP 50",
    "NIFTY MIDCAP 100",
    "NIFTY MIDCAP 150",
    "NIFTY SMALLCAP 50",
    "NIFTY SMALLCAP 100",
    "NIFTY SMALLCAP 250",
    "NIFTY MIDSMALLCAP 400",
    "NIFTY 100",
    "NIFTY 200",
    "NIFTY AUTO",
    "NIFTY BANK",
    "NIFTY ENERGY",
    "NIFTY FINANCIAL SERVICES",
    "NIFTY FINANCIAL SERVICES 25/50",
    "NIFTY FMCG",
    "NIFTY IT",
    "NIFTY MEDIA",
    "NIFTY METAL",
    "NIFTY PHARMA",
    "NIFTY PSU BANK",
    "NIFTY REALTY",
    "NIFTY PRIVATE BANK",
    "Securities in F&O",
    "Permitted to Trade",
    "NIFTY DIVIDEND OPPORTUNITIES 50",
    "NIFTY50 VALUE 20",
    "NIFTY100 QUALITY 30",
    "NIFTY50 EQUAL WEIGHT",
    "NIFTY100 EQUAL WEIGHT",
    "NIFTY100 LOW VOLATILITY 30",
    "NIFTY ALPHA 50",
    "NIFTY200 QUALITY 30",
    "NIFTY ALPHA LOW-VOLATILITY 30",
    "NIFTY200 MOMENTUM 30",
    "NIFTY COMMODITIES",
    "NIFTY INDIA CONSUMPTION",
    "NIFTY CPSE",
    "NIFTY INFRASTRUCTURE",
    "NIFTY MNC",
    "NIFTY GROWTH SECTORS 15",
    "NIFTY PSE",
    "NIFTY SERVICES SECTOR",
    "NIFTY100 LIQUID 15",
    "NIFTY MIDCAP LIQUID 15",
];

/// Case-insensitive lookup of a known index name.
pub fn find_index(name: &str) -> Option<&'static str> {
    INDEX_LIST
        .iter()
        .copied()
        .find(|index| index.eq_ignore_ascii_case(name.trim()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breadth {
    pub advances: usize,
    pub declines: usize,
    pub unchanged: usize,
}

pub fn breadth(quotes: &[IndexQuote]) -> Breadth {
    quotes.iter().fold(Breadth::default(), |mut b, q| {
        match q.p_change.partial_cmp(&0.0) {
            Some(Ordering::Greater) => b.advances += 1,
            Some(Ordering::Less) => b.declines += 1,
            _ => b.unchanged += 1,
        }
        b
    })
}

/// What decides a tile's size on the heatmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SliceBy {
    #[default]
    MarketCap,
    Gainers,
    Losers,
}

impl Display for SliceBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SliceBy::MarketCap => "Market Cap",
                SliceBy::Gainers => "Gainers",
                SliceBy::Losers => "Losers",
            }
        )
    }
}

impl FromStr for SliceBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "market cap" | "marketcap" => Ok(SliceBy::MarketCap),
            "gainers" => Ok(SliceBy::Gainers),
            "losers" => Ok(SliceBy::Losers),
            _ => Err(anyhow::anyhow!("Invalid slice: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub symbol: String,
    pub weight: f64,
    pub last_price: f64,
    pub p_change: f64,
}

/// Tiles for the chosen slice, largest first.
pub fn tiles(quotes: &[IndexQuote], slice: SliceBy) -> Vec<Tile> {
    let mut tiles: Vec<Tile> = quotes
        .iter()
        .filter(|q| slice != SliceBy::Losers || q.p_change < 0.0)
        .map(|q| Tile {
            symbol: q.symbol.clone(),
            weight: match slice {
                SliceBy::MarketCap => q.ffmc_crores,
                SliceBy::Gainers => q.p_change,
                SliceBy::Losers => q.p_change.abs(),
            },
            last_price: q.last_price,
            p_change: q.p_change,
        })
        .collect();
    tiles.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    tiles
}
