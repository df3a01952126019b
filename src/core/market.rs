//! Market data types and the provider abstractions that supply them

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// A row of the exchange's full equity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityListing {
    pub symbol: String,
    pub name: String,
    pub series: Option<String>,
    pub isin: Option<String>,
}

/// A Nifty 50 constituent with its industry classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMember {
    pub symbol: String,
    pub company_name: String,
    pub industry: Option<String>,
    pub isin: Option<String>,
}

/// Unique, non-empty industries in the order they first appear.
pub fn unique_industries(members: &[IndexMember]) -> Vec<String> {
    let mut industries: Vec<String> = Vec::new();
    for industry in members.iter().filter_map(|m| m.industry.as_deref()) {
        let industry = industry.trim();
        if !industry.is_empty() && !industries.iter().any(|i| i == industry) {
            industries.push(industry.to_string());
        }
    }
    industries
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars for one ticker. Unknown tickers yield an empty history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub currency: Option<String>,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

/// Lookback window for a price history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    OneMonth,
    SixMonths,
    #[default]
    OneYear,
    FiveYears,
    Max,
}

impl HistoryRange {
    /// Range parameter understood by the chart endpoint.
    pub fn as_param(&self) -> &'static str {
        match self {
            HistoryRange::OneMonth => "1mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
            HistoryRange::FiveYears => "5y",
            HistoryRange::Max => "max",
        }
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                HistoryRange::OneMonth => "1M",
                HistoryRange::SixMonths => "6M",
                HistoryRange::OneYear => "1Y",
                HistoryRange::FiveYears => "5Y",
                HistoryRange::Max => "MAX",
            }
        )
    }
}

impl FromStr for HistoryRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1M" | "1MO" => Ok(HistoryRange::OneMonth),
            "6M" | "6MO" => Ok(HistoryRange::SixMonths),
            "1Y" => Ok(HistoryRange::OneYear),
            "5Y" => Ok(HistoryRange::FiveYears),
            "MAX" => Ok(HistoryRange::Max),
            _ => Err(anyhow::anyhow!("Invalid history range: {}", s)),
        }
    }
}

/// Company information and key statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub total_revenue: Option<f64>,
    pub gross_profits: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub beta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub publisher: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

impl NewsArticle {
    /// Text to score: the summary when there is one, otherwise the headline.
    pub fn text(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.title)
    }
}

/// One constituent row of a live index snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub last_price: f64,
    pub change: f64,
    pub p_change: f64,
    /// Free-float market cap, in crores.
    pub ffmc_crores: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub index: String,
    pub constituents: Vec<IndexQuote>,
}

/// An annual statement as line items by period, newest period first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    pub periods: Vec<NaiveDate>,
    /// Line item name to one value per entry of `periods`.
    pub items: BTreeMap<String, Vec<Option<f64>>>,
}

impl StatementTable {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// The downloadable financial datasets of a company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialStatements {
    /// Current key financial metrics, e.g. `totalRevenue` or `ebitda`.
    pub financials: BTreeMap<String, f64>,
    pub income_statement: StatementTable,
    pub balance_sheet: StatementTable,
    pub cash_flow: StatementTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: NaiveDate,
    pub amount: f64,
}

#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn equity_list(&self) -> Result<Vec<EquityListing>>;
    async fn nifty50_list(&self) -> Result<Vec<IndexMember>>;

    async fn nifty50_industries(&self) -> Result<Vec<String>> {
        Ok(unique_industries(&self.nifty50_list().await?))
    }
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn price_history(&self, symbol: &str, range: HistoryRange) -> Result<PriceHistory>;
}

#[async_trait]
pub trait CompanyProvider: Send + Sync {
    async fn profile(&self, symbol: &str) -> Result<StockProfile>;
    async fn news(&self, symbol: &str, count: usize) -> Result<Vec<NewsArticle>>;
}

#[async_trait]
pub trait FinancialsProvider: Send + Sync {
    async fn statements(&self, symbol: &str) -> Result<FinancialStatements>;
    /// Dividends paid over the full history, oldest first.
    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>>;
}

#[async_trait]
pub trait IndexProvider: Send + Sync {
    async fn index_snapshot(&self, index: &str) -> Result<IndexSnapshot>;
}
