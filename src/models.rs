use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Placeholder strings shown instead of missing upstream data.
pub mod sentinel {
    pub const PRICE_BLOCKED: &str = "N/A";
    pub const PRICE_ERROR: &str = "error";
    pub const PRICE_NOT_FOUND: &str = "Nicht gefunden";
    pub const BLOCKED: &str = "blocked";

    pub const NEWS_DATE: &str = "today";
    pub const NEWS_TITLE: &str = "NO TITLE";
    pub const NEWS_LINK: &str = "#";

    pub const MISSING_VALUE: &str = "-";
    pub const EVENT_TITLE: &str = "Unknown event";
}

/// Latest quote scraped from the price page. `price` is kept as the
/// displayed string; upstream formatting is not normalized.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quote {
    pub timestamp: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Quote {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsItem {
    pub date: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalendarEvent {
    pub time: String,
    pub country: String,
    pub event: String,
    pub actual: String,
    pub forecast: String,
    pub previous: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Price,
    News,
    Calendar,
}

/// A source whose total fetch fell back to its empty/sentinel value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceFailure {
    pub kind: SourceKind,
    pub source: String,
    pub error: String,
}

/// Everything one refresh produced. Built fresh each time, never stored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AggregateResult {
    pub fetched_at: DateTime<Utc>,
    pub quote: Quote,
    pub news: Vec<NewsItem>,
    pub calendar: Vec<CalendarEvent>,
    #[serde(default)]
    pub failures: Vec<SourceFailure>,
}

impl AggregateResult {
    pub fn failures_of(&self, kind: SourceKind) -> impl Iterator<Item = &SourceFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }
}
