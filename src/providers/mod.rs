pub mod caching;
pub mod nse;
pub mod util;
pub mod yahoo_finance;

pub use caching::{Cached, MarketCaches};
pub use nse::NseProvider;
pub use yahoo_finance::YahooFinanceProvider;
