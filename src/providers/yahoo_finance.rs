use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::core::market::{
    CompanyProvider, Dividend, FinancialStatements, FinancialsProvider, HistoryRange,
    NewsArticle, PriceBar, PriceHistory, PriceHistoryProvider, StatementTable, StockProfile,
};
use crate::providers::util::{ensure_success, http_client, yahoo_symbol};

const PROFILE_MODULES: &str =
    "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics";
const STATEMENT_MODULES: &str =
    "financialData,incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";

pub struct YahooFinanceProvider {
    base_url: String,
    cookie_url: String,
    client: reqwest::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, cookie_url: &str, timeout: Duration) -> Result<Self> {
        Ok(YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: cookie_url.to_string(),
            client: http_client(timeout)?,
            crumb: Mutex::new(None),
        })
    }

    /// Returns the session crumb, fetching it once per provider.
    async fn crumb(&self) -> Result<String> {
        let mut crumb = self.crumb.lock().await;
        if let Some(c) = crumb.as_ref() {
            return Ok(c.clone());
        }

        // This page answers with an error status but sets the session cookie
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            warn!("Failed to get Yahoo session cookie: {}", e);
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        debug!("Requesting crumb from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for crumb", e))?;
        let text = ensure_success(response, "crumb")?.text().await?;
        let value = text.trim().to_string();
        if value.is_empty() {
            return Err(anyhow!("Received empty crumb"));
        }

        *crumb = Some(value.clone());
        Ok(value)
    }

    /// First chart result for `ticker`, or `None` when Yahoo has no chart for it.
    async fn fetch_chart(&self, ticker: &str, params: &[(&str, &str)]) -> Result<Option<ChartItem>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        debug!("Requesting chart from {} with {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, ticker, url))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No chart for {}", ticker);
            return Ok(None);
        }

        let text = ensure_success(response, &format!("symbol {ticker}"))?
            .text()
            .await?;
        let data: ChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse chart response for {}: {}", ticker, e))?;

        Ok(data.chart.result.and_then(|r| r.into_iter().next()))
    }

    /// First quoteSummary result for `ticker` with the given modules.
    async fn fetch_quote_summary<T: DeserializeOwned + Send>(
        &self,
        ticker: &str,
        modules: &str,
    ) -> Result<Option<T>> {
        let crumb = self
            .crumb()
            .await
            .with_context(|| format!("Failed to authenticate for symbol: {ticker}"))?;

        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, ticker);
        debug!("Requesting {} from {}", modules, url);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", modules), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, ticker))?;

        let text = ensure_success(response, &format!("symbol {ticker}"))?
            .text()
            .await?;
        let data: QuoteSummaryResponse<T> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse quote summary for {}: {}", ticker, e))?;

        Ok(data.quote_summary.result.and_then(|r| r.into_iter().next()))
    }
}

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
    events: Option<ChartEvents>,
}

#[derive(Deserialize, Debug)]
struct ChartEvents {
    /// Keyed by the payment timestamp as a string
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
}

#[derive(Deserialize, Debug)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    currency: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Zips the chart's column arrays into bars, skipping sessions with any
/// missing price.
fn extract_bars(timestamps: &[i64], quote: &Quote) -> Vec<PriceBar> {
    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            Some(PriceBar {
                date,
                open: (*quote.open.get(i)?)?,
                high: (*quote.high.get(i)?)?,
                low: (*quote.low.get(i)?)?,
                close: (*quote.close.get(i)?)?,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect()
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceProvider {
    #[instrument(name = "YahooHistoryFetch", skip(self), fields(symbol = %symbol))]
    async fn price_history(&self, symbol: &str, range: HistoryRange) -> Result<PriceHistory> {
        let ticker = yahoo_symbol(symbol);
        let chart = self
            .fetch_chart(&ticker, &[("interval", "1d"), ("range", range.as_param())])
            .await?;

        let Some(item) = chart else {
            debug!("No chart data for {}, treating as empty history", ticker);
            return Ok(PriceHistory {
                symbol: ticker,
                ..Default::default()
            });
        };

        let bars = match (
            item.timestamp.as_deref(),
            item.indicators.as_ref().and_then(|i| i.quote.first()),
        ) {
            (Some(timestamps), Some(quote)) => extract_bars(timestamps, quote),
            _ => Vec::new(),
        };

        Ok(PriceHistory {
            symbol: ticker,
            currency: item.meta.and_then(|m| m.currency),
            bars,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse<T> {
    quote_summary: QuoteSummary<T>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary<T> {
    result: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_profile: Option<SummaryProfile>,
    summary_detail: Option<SummaryDetail>,
    financial_data: Option<FinancialData>,
    default_key_statistics: Option<KeyStatistics>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when absent.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct SummaryProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    market_cap: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_day_average: Option<RawValue>,
    two_hundred_day_average: Option<RawValue>,
    beta: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    total_revenue: Option<RawValue>,
    gross_profits: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatistics {
    beta: Option<RawValue>,
}

impl QuoteSummaryResult {
    fn into_profile(self, symbol: String) -> StockProfile {
        let (long_name, price_market_cap) = match self.price {
            Some(p) => (p.long_name.or(p.short_name), raw(p.market_cap)),
            None => (None, None),
        };
        let (sector, industry) = match self.summary_profile {
            Some(p) => (p.sector, p.industry),
            None => (None, None),
        };
        let detail = self.summary_detail;
        let detail_field = |f: fn(&SummaryDetail) -> Option<RawValue>| raw(detail.as_ref().and_then(f));

        StockProfile {
            symbol,
            long_name,
            sector,
            industry,
            market_cap: detail_field(|d| d.market_cap).or(price_market_cap),
            total_revenue: raw(self.financial_data.as_ref().and_then(|f| f.total_revenue)),
            gross_profits: raw(self.financial_data.as_ref().and_then(|f| f.gross_profits)),
            fifty_two_week_low: detail_field(|d| d.fifty_two_week_low),
            fifty_two_week_high: detail_field(|d| d.fifty_two_week_high),
            fifty_day_average: detail_field(|d| d.fifty_day_average),
            two_hundred_day_average: detail_field(|d| d.two_hundred_day_average),
            beta: detail_field(|d| d.beta)
                .or_else(|| raw(self.default_key_statistics.as_ref().and_then(|k| k.beta))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
struct SearchNewsItem {
    title: String,
    publisher: Option<String>,
    summary: Option<String>,
    link: Option<String>,
}

impl From<SearchNewsItem> for NewsArticle {
    fn from(item: SearchNewsItem) -> Self {
        NewsArticle {
            title: item.title,
            publisher: item.publisher,
            summary: item.summary,
            link: item.link,
        }
    }
}

#[async_trait]
impl CompanyProvider for YahooFinanceProvider {
    #[instrument(name = "YahooProfileFetch", skip(self), fields(symbol = %symbol))]
    async fn profile(&self, symbol: &str) -> Result<StockProfile> {
        let ticker = yahoo_symbol(symbol);
        let result: QuoteSummaryResult = self
            .fetch_quote_summary(&ticker, PROFILE_MODULES)
            .await?
            .ok_or_else(|| anyhow!("No profile data found for symbol: {}", ticker))?;

        Ok(result.into_profile(ticker))
    }

    #[instrument(name = "YahooNewsFetch", skip(self), fields(symbol = %symbol))]
    async fn news(&self, symbol: &str, count: usize) -> Result<Vec<NewsArticle>> {
        let ticker = yahoo_symbol(symbol);
        let url = format!("{}/v1/finance/search", self.base_url);
        let news_count = count.to_string();
        debug!("Requesting news from {} for {}", url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", ticker.as_str()),
                ("quotesCount", "0"),
                ("newsCount", news_count.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for news: {}", e, ticker))?;

        let data: SearchResponse = ensure_success(response, &format!("news {ticker}"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse news response for {ticker}"))?;

        Ok(data
            .news
            .into_iter()
            .take(count)
            .map(NewsArticle::from)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementsResult {
    financial_data: Option<Map<String, Value>>,
    income_statement_history: Option<StatementHistory>,
    balance_sheet_history: Option<StatementHistory>,
    cashflow_statement_history: Option<StatementHistory>,
}

/// Each history module nests its statements under a module-specific key.
#[derive(Debug, Deserialize)]
struct StatementHistory {
    #[serde(
        default,
        alias = "incomeStatementHistory",
        alias = "balanceSheetStatements",
        alias = "cashflowStatements"
    )]
    statements: Vec<Map<String, Value>>,
}

fn raw_number(value: &Value) -> Option<f64> {
    value.get("raw")?.as_f64()
}

fn timestamp_date(ts: i64) -> Option<chrono::NaiveDate> {
    Some(Utc.timestamp_opt(ts, 0).single()?.date_naive())
}

fn statement_table(history: Option<StatementHistory>) -> StatementTable {
    let mut dated: Vec<_> = history
        .map(|h| h.statements)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|statement| {
            let ts = statement.get("endDate").and_then(raw_number)?;
            Some((timestamp_date(ts as i64)?, statement))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut table = StatementTable::default();
    let periods = dated.len();
    for (i, (date, statement)) in dated.into_iter().enumerate() {
        table.periods.push(date);
        for (name, value) in statement {
            if name == "endDate" || !value.is_object() {
                continue;
            }
            let values = table
                .items
                .entry(name)
                .or_insert_with(|| vec![None; periods]);
            values[i] = raw_number(&value);
        }
    }
    table
}

impl From<StatementsResult> for FinancialStatements {
    fn from(result: StatementsResult) -> Self {
        FinancialStatements {
            financials: result
                .financial_data
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(name, value)| Some((name, raw_number(&value)?)))
                .collect(),
            income_statement: statement_table(result.income_statement_history),
            balance_sheet: statement_table(result.balance_sheet_history),
            cash_flow: statement_table(result.cashflow_statement_history),
        }
    }
}

#[async_trait]
impl FinancialsProvider for YahooFinanceProvider {
    #[instrument(name = "YahooStatementsFetch", skip(self), fields(symbol = %symbol))]
    async fn statements(&self, symbol: &str) -> Result<FinancialStatements> {
        let ticker = yahoo_symbol(symbol);
        let result: StatementsResult = self
            .fetch_quote_summary(&ticker, STATEMENT_MODULES)
            .await?
            .ok_or_else(|| anyhow!("No financial data found for symbol: {}", ticker))?;
        Ok(result.into())
    }

    #[instrument(name = "YahooDividendsFetch", skip(self), fields(symbol = %symbol))]
    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>> {
        let ticker = yahoo_symbol(symbol);
        let chart = self
            .fetch_chart(
                &ticker,
                &[("interval", "1d"), ("range", "max"), ("events", "div")],
            )
            .await?;

        let mut dividends: Vec<Dividend> = chart
            .and_then(|item| item.events)
            .map(|events| events.dividends.into_values().collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|event| {
                Some(Dividend {
                    date: timestamp_date(event.date)?,
                    amount: event.amount,
                })
            })
            .collect();
        dividends.sort_by_key(|d| d.date);
        debug!("Fetched {} dividends for {}", dividends.len(), ticker);
        Ok(dividends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> YahooFinanceProvider {
        YahooFinanceProvider::new(
            &server.uri(),
            &format!("{}/cookie", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn create_chart_mock(server: &MockServer, ticker: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{ticker}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_price_history() {
        let server = MockServer::start().await;
        // 2024-01-01, 2024-01-02 and 2024-01-03 at 03:45 UTC
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "INR", "regularMarketPrice": 2610.0},
                    "timestamp": [1704080700, 1704167100, 1704253500],
                    "indicators": {
                        "quote": [{
                            "open":   [2580.0, null, 2600.0],
                            "high":   [2600.0, 2615.0, 2620.0],
                            "low":    [2570.0, 2590.0, 2595.0],
                            "close":  [2590.5, 2605.0, 2610.0],
                            "volume": [1200000, 1300000, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        create_chart_mock(&server, "RELIANCE.NS", 200, body).await;

        let history = provider(&server)
            .price_history("reliance", HistoryRange::OneYear)
            .await
            .unwrap();

        assert_eq!(history.symbol, "RELIANCE.NS");
        assert_eq!(history.currency.as_deref(), Some("INR"));
        // The second session has no open and is skipped
        assert_eq!(history.bars.len(), 2);
        assert_eq!(
            history.bars[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(history.bars[0].close, 2590.5);
        assert_eq!(history.bars[0].volume, 1_200_000);
        assert_eq!(history.latest().unwrap().volume, 0);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_empty_history() {
        let server = MockServer::start().await;
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        create_chart_mock(&server, "NOPE.NS", 404, body).await;

        let history = provider(&server)
            .price_history("NOPE", HistoryRange::OneYear)
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_empty_history() {
        let server = MockServer::start().await;
        create_chart_mock(&server, "TCS.NS", 200, r#"{"chart": {"result": []}}"#).await;

        let history = provider(&server)
            .price_history("TCS", HistoryRange::Max)
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_price_history_server_error() {
        let server = MockServer::start().await;
        create_chart_mock(&server, "TCS.NS", 500, "").await;

        let result = provider(&server)
            .price_history("TCS", HistoryRange::OneYear)
            .await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("HTTP error: 500 Internal Server Error for symbol TCS.NS")
        );
    }

    async fn mount_crumb(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(404).insert_header("set-cookie", "A3=abc; Path=/"))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/test/getcrumb"))
            .respond_with(ResponseTemplate::new(200).set_body_string("crumb123"))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_profile() {
        let server = MockServer::start().await;
        mount_crumb(&server).await;

        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"longName": "Tata Consultancy Services Limited", "shortName": "TCS", "marketCap": {"raw": 14000000000000}},
                    "summaryProfile": {"sector": "Technology", "industry": "Information Technology Services"},
                    "summaryDetail": {
                        "marketCap": {"raw": 14250000000000, "fmt": "14.25T"},
                        "fiftyTwoWeekLow": {"raw": 3311.0},
                        "fiftyTwoWeekHigh": {"raw": 4592.25},
                        "fiftyDayAverage": {"raw": 4100.5},
                        "twoHundredDayAverage": {"raw": 3950.1},
                        "beta": {}
                    },
                    "financialData": {"totalRevenue": {"raw": 2408930000000}, "grossProfits": {"raw": 950000000000}},
                    "defaultKeyStatistics": {"beta": {"raw": 0.55}}
                }],
                "error": null
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/v10/finance/quoteSummary/TCS.NS"))
            .and(query_param("crumb", "crumb123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let profile = provider.profile("TCS").await.unwrap();
        assert_eq!(
            profile.long_name.as_deref(),
            Some("Tata Consultancy Services Limited")
        );
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.market_cap, Some(14_250_000_000_000.0));
        assert_eq!(profile.total_revenue, Some(2_408_930_000_000.0));
        assert_eq!(profile.fifty_two_week_high, Some(4592.25));
        // Falls back to key statistics when the summary has no beta
        assert_eq!(profile.beta, Some(0.55));

        // Crumb is reused
        provider.profile("TCS").await.unwrap();
    }

    #[tokio::test]
    async fn test_profile_without_result() {
        let server = MockServer::start().await;
        mount_crumb(&server).await;
        Mock::given(method("GET"))
            .and(path("/v10/finance/quoteSummary/NOPE.NS"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"quoteSummary": {"result": null, "error": {}}}"#),
            )
            .mount(&server)
            .await;

        let err = provider(&server).profile("NOPE").await.unwrap_err();
        assert_eq!(err.to_string(), "No profile data found for symbol: NOPE.NS");
    }

    #[tokio::test]
    async fn test_statements() {
        let server = MockServer::start().await;
        mount_crumb(&server).await;

        // 2024-03-31 and 2023-03-31, listed oldest first on purpose
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "financialData": {
                        "maxAge": 86400,
                        "totalRevenue": {"raw": 1536700000000, "fmt": "1.54T"},
                        "ebitda": {"raw": 365000000000},
                        "grossProfits": {"raw": -45000000},
                        "targetMeanPrice": {},
                        "financialCurrency": "INR"
                    },
                    "incomeStatementHistory": {
                        "incomeStatementHistory": [
                            {"maxAge": 1, "endDate": {"raw": 1680220800, "fmt": "2023-03-31"}, "totalRevenue": {"raw": 1467670000000}, "netIncome": {"raw": 240950000000}},
                            {"maxAge": 1, "endDate": {"raw": 1711843200, "fmt": "2024-03-31"}, "totalRevenue": {"raw": 1536700000000}, "netIncome": {}}
                        ],
                        "maxAge": 86400
                    },
                    "balanceSheetHistory": {
                        "balanceSheetStatements": [
                            {"endDate": {"raw": 1711843200}, "cash": {"raw": 147730000000}}
                        ]
                    }
                }],
                "error": null
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/v10/finance/quoteSummary/INFY.NS"))
            .and(query_param("modules", STATEMENT_MODULES))
            .and(query_param("crumb", "crumb123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let statements = provider(&server).statements("INFY").await.unwrap();

        assert_eq!(statements.financials.get("totalRevenue"), Some(&1_536_700_000_000.0));
        assert_eq!(statements.financials.get("grossProfits"), Some(&-45_000_000.0));
        assert!(!statements.financials.contains_key("targetMeanPrice"));
        assert!(!statements.financials.contains_key("maxAge"));

        let income = &statements.income_statement;
        assert_eq!(
            income.periods,
            vec![
                chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()
            ]
        );
        assert_eq!(
            income.items["totalRevenue"],
            vec![Some(1_536_700_000_000.0), Some(1_467_670_000_000.0)]
        );
        assert_eq!(income.items["netIncome"], vec![None, Some(240_950_000_000.0)]);
        assert!(!income.items.contains_key("maxAge"));

        assert_eq!(statements.balance_sheet.items["cash"], vec![Some(147_730_000_000.0)]);
        assert!(statements.cash_flow.is_empty());
    }

    #[tokio::test]
    async fn test_statements_server_error() {
        let server = MockServer::start().await;
        mount_crumb(&server).await;
        Mock::given(method("GET"))
            .and(path("/v10/finance/quoteSummary/INFY.NS"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider(&server).statements("INFY").await.unwrap_err();
        assert!(
            err.to_string()
                .starts_with("HTTP error: 500 Internal Server Error for symbol INFY.NS")
        );
    }

    #[tokio::test]
    async fn test_dividends() {
        let server = MockServer::start().await;
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "INR"},
                    "timestamp": [1716263100],
                    "events": {
                        "dividends": {
                            "1716263100": {"amount": 20.0, "date": 1716263100},
                            "1698119100": {"amount": 18.0, "date": 1698119100}
                        }
                    },
                    "indicators": {"quote": [{"close": [1450.0]}]}
                }]
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/INFY.NS"))
            .and(query_param("events", "div"))
            .and(query_param("range", "max"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let dividends = provider(&server).dividends("INFY").await.unwrap();
        assert_eq!(
            dividends,
            vec![
                Dividend {
                    date: chrono::NaiveDate::from_ymd_opt(2023, 10, 24).unwrap(),
                    amount: 18.0,
                },
                Dividend {
                    date: chrono::NaiveDate::from_ymd_opt(2024, 5, 21).unwrap(),
                    amount: 20.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_dividends_without_events() {
        let server = MockServer::start().await;
        create_chart_mock(&server, "NEWCO.NS", 200, r#"{"chart": {"result": [{"meta": {}}]}}"#).await;

        let dividends = provider(&server).dividends("NEWCO").await.unwrap();
        assert!(dividends.is_empty());
    }

    #[tokio::test]
    async fn test_news() {
        let server = MockServer::start().await;
        let body = r#"{
            "quotes": [],
            "news": [
                {"uuid": "1", "title": "Infosys shares surge on strong results", "publisher": "Mint", "link": "https://example.com/1"},
                {"uuid": "2", "title": "IT stocks fall", "publisher": "ET"},
                {"uuid": "3", "title": "Third story"}
            ]
        }"#;
        Mock::given(method("GET"))
            .and(path("/v1/finance/search"))
            .and(query_param("q", "INFY.NS"))
            .and(query_param("newsCount", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let news = provider(&server).news("INFY", 2).await.unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].publisher.as_deref(), Some("Mint"));
        assert_eq!(news[1].title, "IT stocks fall");
        assert!(news[1].link.is_none());
    }
}
