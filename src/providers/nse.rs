use crate::core::market::{
    EquityListing, IndexMember, IndexProvider, IndexQuote, IndexSnapshot, ReferenceDataProvider,
};
use crate::providers::util::{ensure_success, http_client, lenient_f64};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, REFERER};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct NseProvider {
    base_url: String,
    archives_url: String,
    client: reqwest::Client,
}

impl NseProvider {
    pub fn new(base_url: &str, archives_url: &str, timeout: Duration) -> Result<Self> {
        Ok(NseProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            archives_url: archives_url.trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    async fn fetch_csv<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.archives_url, path);
        debug!("Requesting CSV from {}", url);

        let response = self
            .client
            .get(&url)
            .header(REFERER, &self.base_url)
            .send()
            .await
            .with_context(|| format!("Request error for {url}"))?;
        let text = ensure_success(response, "CSV list")?
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        parse_csv(&text).with_context(|| format!("Failed to parse CSV from {url}"))
    }
}

fn parse_csv<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct EquityRow {
    #[serde(rename = "SYMBOL")]
    symbol: String,
    #[serde(rename = "NAME OF COMPANY")]
    name: String,
    #[serde(rename = "SERIES", default)]
    series: Option<String>,
    #[serde(rename = "ISIN NUMBER", default)]
    isin: Option<String>,
}

impl From<EquityRow> for EquityListing {
    fn from(row: EquityRow) -> Self {
        EquityListing {
            symbol: row.symbol,
            name: row.name,
            series: non_empty(row.series),
            isin: non_empty(row.isin),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Nifty50Row {
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Industry", default)]
    industry: Option<String>,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "ISIN Code", default)]
    isin: Option<String>,
}

impl From<Nifty50Row> for IndexMember {
    fn from(row: Nifty50Row) -> Self {
        IndexMember {
            symbol: row.symbol,
            company_name: row.company_name,
            industry: non_empty(row.industry),
            isin: non_empty(row.isin),
        }
    }
}

#[async_trait]
impl ReferenceDataProvider for NseProvider {
    async fn equity_list(&self) -> Result<Vec<EquityListing>> {
        let rows: Vec<EquityRow> = self.fetch_csv("/content/equities/EQUITY_L.csv").await?;
        debug!("Fetched {} equities", rows.len());
        Ok(rows.into_iter().map(EquityListing::from).collect())
    }

    async fn nifty50_list(&self) -> Result<Vec<IndexMember>> {
        let rows: Vec<Nifty50Row> = self
            .fetch_csv("/content/indices/ind_nifty50list.csv")
            .await?;
        debug!("Fetched {} Nifty 50 constituents", rows.len());
        Ok(rows.into_iter().map(IndexMember::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(default)]
    data: Vec<IndexRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexRow {
    symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    last_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    p_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    ffmc: Option<f64>,
}

impl From<IndexRow> for IndexQuote {
    fn from(row: IndexRow) -> Self {
        IndexQuote {
            symbol: row.symbol,
            last_price: row.last_price.unwrap_or_default(),
            change: row.change.unwrap_or_default(),
            p_change: row.p_change.unwrap_or_default(),
            ffmc_crores: row.ffmc.map_or(0.0, |f| (f / 1e7).round()),
        }
    }
}

#[async_trait]
impl IndexProvider for NseProvider {
    #[instrument(name = "NseIndexFetch", skip(self), fields(index = %index))]
    async fn index_snapshot(&self, index: &str) -> Result<IndexSnapshot> {
        let index = index.trim().to_uppercase();

        // The API only answers clients holding the cookies set by the market page
        let page_url = format!("{}/market-data/live-equity-market", self.base_url);
        if let Err(e) = self
            .client
            .get(&page_url)
            .query(&[("symbol", index.as_str())])
            .send()
            .await
        {
            warn!("Failed to prime NSE session cookies: {}", e);
        }

        let url = format!("{}/api/equity-stockIndices", self.base_url);
        debug!("Requesting index details from {} for {}", url, index);
        let response = self
            .client
            .get(&url)
            .query(&[("index", index.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request error for index: {index}"))?;

        let text = ensure_success(response, &format!("index {index}"))?
            .text()
            .await?;
        let data: IndexResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse index response for {index}"))?;

        // The first row is the index itself, not a constituent
        let constituents = data
            .data
            .into_iter()
            .skip(1)
            .map(IndexQuote::from)
            .collect();

        Ok(IndexSnapshot {
            index,
            constituents,
        })
    }
}
