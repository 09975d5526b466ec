//! Settings structures for marquee configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main settings structure matching `marquee.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub omdb: OmdbSettings,
    pub aggregator: AggregatorSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MARQUEE_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from any key lookup; `merge_env` uses the process environment
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MARQUEE_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("MARQUEE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("MARQUEE_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("MARQUEE_OMDB_API_KEY") {
            self.omdb.api_key = val;
        }
        if let Some(val) = lookup("MARQUEE_OMDB_BASE_URL") {
            self.omdb.base_url = val;
        }
    }

    /// Reject settings the aggregator cannot work with
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.omdb.base_url)
            .with_context(|| format!("invalid omdb.base_url: {}", self.omdb.base_url))?;

        let agg = &self.aggregator;
        if agg.enrich_cap == 0 || agg.year_panel_cap == 0 || agg.rank_cap == 0 {
            bail!("aggregator caps must be greater than zero");
        }
        if self.outgoing.max_concurrent_requests == 0 {
            bail!("outgoing.max_concurrent_requests must be greater than zero");
        }
        let timeout = self.outgoing.request_timeout;
        if !(timeout.is_finite() && timeout > 0.0) {
            bail!("outgoing.request_timeout must be a positive number of seconds");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Marquee".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Upper bound on in-flight detail requests during enrichment and ranking
    pub max_concurrent_requests: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent sent with every request (none = crate name and version)
    pub useragent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 10,
            max_concurrent_requests: 4,
            verify_ssl: true,
            useragent: None,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Movie database API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbSettings {
    pub base_url: String,
    pub api_key: String,
}

impl Default for OmdbSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: String::new(),
        }
    }
}

/// Bounds and seed lists used by the aggregation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    /// Primary results enriched with detail when a filter is applied
    pub enrich_cap: usize,
    /// Size of the "movies from year X" panel
    pub year_panel_cap: usize,
    /// Panel entries looked up when ranking by rating
    pub rank_cap: usize,
    /// Terms searched, in order, to fill the year panel
    pub seed_terms: Vec<String>,
    /// Candidates for the initial query before any user input
    pub initial_keywords: Vec<String>,
    /// Year shown in the panel when none is requested (none = current year)
    pub default_year: Option<String>,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            enrich_cap: 10,
            year_panel_cap: 20,
            rank_cap: 20,
            seed_terms: default_seed_terms(),
            initial_keywords: default_initial_keywords(),
            default_year: None,
        }
    }
}

fn default_seed_terms() -> Vec<String> {
    [
        "love", "war", "man", "life", "king", "night", "day", "world", "girl", "star", "house",
        "time",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_initial_keywords() -> Vec<String> {
    [
        "batman", "avengers", "matrix", "inception", "godfather", "alien", "jurassic", "titanic",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
