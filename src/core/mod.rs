//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod format;
pub mod heatmap;
pub mod log;
pub mod market;
pub mod sentiment;

// Re-export main types for cleaner imports
pub use cache::{FetchCache, FetchError, FetchKey};
pub use format::format_value;
pub use market::{
    CompanyProvider, HistoryRange, IndexProvider, PriceHistoryProvider, ReferenceDataProvider,
};
pub use sentiment::{SentimentAnalyzer, sentiment_score};
