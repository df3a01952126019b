use anyhow::{Result, anyhow};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Exchange and quote endpoints reject requests that don't look like they come
/// from a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Builds a client with browser-like defaults and a session cookie store.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let client = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .cookie_store(true)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Turns a non-success status into an error naming what was being fetched.
pub fn ensure_success(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!(
            "HTTP error: {} for {}: {}",
            status,
            what,
            response.url()
        ));
    }
    Ok(response)
}

/// Exchange symbol as listed on Yahoo. Bare NSE symbols get the `.NS` suffix;
/// symbols that already carry an exchange suffix or are indices pass through.
pub fn yahoo_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if symbol.contains('.') || symbol.starts_with('^') {
        symbol
    } else {
        format!("{symbol}.NS")
    }
}

/// Accepts a JSON number, a numeric string, or null/"-"/"" as missing.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Text(s)) => s.trim().replace(',', "").parse().ok(),
            None => None,
        },
    )
}
