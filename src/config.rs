//! Explicit configuration for every upstream source.
//!
//! `Default` carries the fixed production endpoints; `from_env` lets a `.env`
//! file or the process environment point individual sources elsewhere.

use std::time::Duration;
use tracing::warn;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const PRIMARY_NEWS_CAP: usize = 8;
pub const SECONDARY_NEWS_CAP: usize = 15;

/// Where to fetch from and how.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl SourceConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: vec![("User-Agent".to_string(), BROWSER_USER_AGENT.to_string())],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub source: SourceConfig,
    /// Tag name of the element holding the price
    pub element: String,
    /// Value of its `data-field` attribute
    pub field: String,
    /// Value of its `data-symbol` attribute
    pub symbol: String,
}

impl PriceConfig {
    /// Compound attribute selector identifying the price element.
    pub fn selector(&self) -> String {
        format!(
            r#"{}[data-field="{}"][data-symbol="{}"]"#,
            self.element, self.field, self.symbol
        )
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::new("https://finance.yahoo.com/quote/GC=F/")
                .with_header("Accept", "text/html,application/xhtml+xml")
                .with_header("Accept-Language", "de-DE,de;q=0.9,en;q=0.8"),
            element: "fin-streamer".to_string(),
            field: "regularMarketPrice".to_string(),
            symbol: "GC=F".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub name: String,
    pub source: SourceConfig,
    pub cap: usize,
}

impl FeedConfig {
    pub fn new(name: &str, url: &str, cap: usize) -> Self {
        Self {
            name: name.to_string(),
            source: SourceConfig::new(url),
            cap,
        }
    }

    pub fn primary() -> Self {
        Self::new(
            "Gold News",
            "https://www.fxstreet.com/rss/news",
            PRIMARY_NEWS_CAP,
        )
    }

    pub fn secondary() -> Self {
        Self::new(
            "Google News",
            "https://news.google.com/rss/search?q=gold+price&hl=en-US&gl=US&ceid=US:en",
            SECONDARY_NEWS_CAP,
        )
    }
}

#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub source: SourceConfig,
    pub countries: Vec<String>,
    /// Importance filter sent upstream. Only "1" (high impact) is used.
    pub importance: String,
    pub window_days: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::new("https://economic-calendar.tradingview.com/events")
                .with_header("Origin", "https://www.tradingview.com")
                .with_header("Referer", "https://www.tradingview.com/"),
            countries: ["US", "EU", "GB", "DE", "JP", "CN", "CH"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            importance: "1".to_string(),
            window_days: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Acceptable model identifiers, most preferred first
    pub models: Vec<String>,
    pub timeout: Duration,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            models: vec!["gemini-1.5-flash".to_string(), "gemini-pro".to_string()],
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub price: PriceConfig,
    pub feeds: Vec<FeedConfig>,
    pub calendar: CalendarConfig,
    pub summarizer: SummarizerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            price: PriceConfig::default(),
            feeds: vec![FeedConfig::primary()],
            calendar: CalendarConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by the environment (and `.env`, if present).
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Failed to load .env: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("GOLD_QUOTE_URL") {
            config.price.source.url = url;
        }
        if let Some(url) = get("GOLD_NEWS_URL") {
            config.feeds[0].source.url = url;
        }
        if let Some(url) = get("GOLD_SECONDARY_NEWS_URL") {
            let mut feed = FeedConfig::secondary();
            feed.source.url = url;
            config.feeds.push(feed);
        }
        if let Some(url) = get("GOLD_CALENDAR_URL") {
            config.calendar.source.url = url;
        }
        if let Some(raw) = get("GOLD_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.set_timeout(Duration::from_secs(secs)),
                Err(_) => warn!("Ignoring GOLD_HTTP_TIMEOUT_SECS={:?}: not a number", raw),
            }
        }

        config.summarizer.api_key = get("GEMINI_API_KEY");
        if let Some(base) = get("GEMINI_BASE_URL") {
            config.summarizer.base_url = base;
        }
        if let Some(list) = get("GEMINI_MODELS") {
            let models: Vec<String> = list
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !models.is_empty() {
                config.summarizer.models = models;
            }
        }

        config
    }

    /// Adds the secondary news feed unless one is already configured.
    pub fn with_secondary_news(mut self) -> Self {
        if self.feeds.len() < 2 {
            self.feeds.push(FeedConfig::secondary());
        }
        self
    }

    /// Applies one timeout to the price, news and calendar sources.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.price.source.timeout = timeout;
        self.calendar.source.timeout = timeout;
        for feed in &mut self.feeds {
            feed.source.timeout = timeout;
        }
    }
}
