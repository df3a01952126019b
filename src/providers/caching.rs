use crate::core::cache::{FetchCache, FetchKey};
use crate::core::config::CacheConfig;
use crate::core::market::{
    CompanyProvider, Dividend, EquityListing, FinancialStatements, FinancialsProvider,
    HistoryRange, IndexMember, IndexProvider, IndexSnapshot, NewsArticle, PriceHistory,
    PriceHistoryProvider, ReferenceDataProvider, StockProfile,
};
use anyhow::Result;
use async_trait::async_trait;

/// The shared caches, one per result type. Built once per process and handed
/// to every caching provider.
#[derive(Clone, Default)]
pub struct MarketCaches {
    pub equities: FetchCache<FetchKey, Vec<EquityListing>>,
    pub nifty50: FetchCache<FetchKey, Vec<IndexMember>>,
    pub history: FetchCache<FetchKey, PriceHistory>,
    pub profiles: FetchCache<FetchKey, StockProfile>,
    pub news: FetchCache<FetchKey, Vec<NewsArticle>>,
    pub statements: FetchCache<FetchKey, FinancialStatements>,
    pub dividends: FetchCache<FetchKey, Vec<Dividend>>,
    pub indices: FetchCache<FetchKey, IndexSnapshot>,
}

impl MarketCaches {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Wraps a provider so that each call goes through the shared caches with the
/// configured validity windows.
pub struct Cached<T> {
    inner: T,
    caches: MarketCaches,
    ttl: CacheConfig,
}

impl<T> Cached<T> {
    pub fn new(inner: T, caches: MarketCaches, ttl: CacheConfig) -> Self {
        Self { inner, caches, ttl }
    }
}

// Reference lists never change within a run
#[async_trait]
impl<T: ReferenceDataProvider> ReferenceDataProvider for Cached<T> {
    async fn equity_list(&self) -> Result<Vec<EquityListing>> {
        let key = FetchKey::new("nse.equity_list");
        Ok(self
            .caches
            .equities
            .get_or_fetch(key, || self.inner.equity_list(), None)
            .await?)
    }

    async fn nifty50_list(&self) -> Result<Vec<IndexMember>> {
        let key = FetchKey::new("nse.nifty50_list");
        Ok(self
            .caches
            .nifty50
            .get_or_fetch(key, || self.inner.nifty50_list(), None)
            .await?)
    }
}

#[async_trait]
impl<T: PriceHistoryProvider> PriceHistoryProvider for Cached<T> {
    async fn price_history(&self, symbol: &str, range: HistoryRange) -> Result<PriceHistory> {
        let key = FetchKey::new("yahoo.price_history")
            .with_arg(symbol.to_uppercase())
            .with_arg(range.as_param());
        Ok(self
            .caches
            .history
            .get_or_fetch(
                key,
                || self.inner.price_history(symbol, range),
                self.ttl.history_ttl(),
            )
            .await?)
    }
}

#[async_trait]
impl<T: CompanyProvider> CompanyProvider for Cached<T> {
    async fn profile(&self, symbol: &str) -> Result<StockProfile> {
        let key = FetchKey::new("yahoo.profile").with_arg(symbol.to_uppercase());
        Ok(self
            .caches
            .profiles
            .get_or_fetch(key, || self.inner.profile(symbol), self.ttl.profile_ttl())
            .await?)
    }

    async fn news(&self, symbol: &str, count: usize) -> Result<Vec<NewsArticle>> {
        let key = FetchKey::new("yahoo.news")
            .with_arg(symbol.to_uppercase())
            .with_arg(count.to_string());
        Ok(self
            .caches
            .news
            .get_or_fetch(key, || self.inner.news(symbol, count), self.ttl.news_ttl())
            .await?)
    }
}

// Statements and dividends change no faster than the profile
#[async_trait]
impl<T: FinancialsProvider> FinancialsProvider for Cached<T> {
    async fn statements(&self, symbol: &str) -> Result<FinancialStatements> {
        let key = FetchKey::new("yahoo.statements").with_arg(symbol.to_uppercase());
        Ok(self
            .caches
            .statements
            .get_or_fetch(key, || self.inner.statements(symbol), self.ttl.profile_ttl())
            .await?)
    }

    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>> {
        let key = FetchKey::new("yahoo.dividends").with_arg(symbol.to_uppercase());
        Ok(self
            .caches
            .dividends
            .get_or_fetch(key, || self.inner.dividends(symbol), self.ttl.profile_ttl())
            .await?)
    }
}

#[async_trait]
impl<T: IndexProvider> IndexProvider for Cached<T> {
    async fn index_snapshot(&self, index: &str) -> Result<IndexSnapshot> {
        let key = FetchKey::new("nse.index_snapshot").with_arg(index.trim().to_uppercase());
        Ok(self
            .caches
            .indices
            .get_or_fetch(key, || self.inner.index_snapshot(index), self.ttl.index_ttl())
            .await?)
    }
}
