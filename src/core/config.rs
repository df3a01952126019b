use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct YahooProviderConfig {
    pub base_url: String,
    /// Page visited first so the crumb request carries a session cookie.
    pub cookie_url: String,
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        YahooProviderConfig {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct NseProviderConfig {
    pub base_url: String,
    pub archives_url: String,
}

impl Default for NseProviderConfig {
    fn default() -> Self {
        NseProviderConfig {
            base_url: "https://www.nseindia.com".to_string(),
            archives_url: "https://archives.nseindia.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub yahoo: YahooProviderConfig,
    pub nse: NseProviderConfig,
}

/// Validity windows for cached fetches. A missing value means the result is
/// kept for the lifetime of the process.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub history_ttl_secs: Option<u64>,
    pub profile_ttl_secs: Option<u64>,
    pub news_ttl_secs: Option<u64>,
    pub index_ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            history_ttl_secs: None,
            profile_ttl_secs: None,
            news_ttl_secs: None,
            index_ttl_secs: Some(300),
        }
    }
}

impl CacheConfig {
    pub fn history_ttl(&self) -> Option<Duration> {
        self.history_ttl_secs.map(Duration::from_secs)
    }

    pub fn profile_ttl(&self) -> Option<Duration> {
        self.profile_ttl_secs.map(Duration::from_secs)
    }

    pub fn news_ttl(&self) -> Option<Duration> {
        self.news_ttl_secs.map(Duration::from_secs)
    }

    pub fn index_ttl(&self) -> Option<Duration> {
        self.index_ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig { timeout_secs: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    /// Extra or replacement word valences for the news analyzer.
    pub lexicon: HashMap<String, f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub sentiment: SentimentConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "marketsage", "marketsage")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
  nse:
    base_url: "http://example.com/nse"
    archives_url: "http://example.com/archives"
cache:
  history_ttl_secs: 3600
  index_ttl_secs: 60
http:
  timeout_secs: 5
sentiment:
  lexicon:
    multibagger: 3.0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.yahoo.base_url, "http://example.com/yahoo");
        // Unspecified keys keep their defaults
        assert_eq!(config.providers.yahoo.cookie_url, "https://fc.yahoo.com");
        assert_eq!(config.providers.nse.base_url, "http://example.com/nse");
        assert_eq!(
            config.providers.nse.archives_url,
            "http://example.com/archives"
        );
        assert_eq!(config.cache.history_ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.cache.index_ttl(), Some(Duration::from_secs(60)));
        assert_eq!(config.cache.profile_ttl(), None);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.sentiment.lexicon.get("multibagger"), Some(&3.0));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cache.index_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(config.cache.news_ttl(), None);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(
            config.providers.nse.archives_url,
            "https://archives.nseindia.com"
        );
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let err = AppConfig::load_from_path("/nonexistent/marketsage.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
