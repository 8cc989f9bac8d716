//! RSS/Atom feed reader for gold market headlines

use async_trait::async_trait;
use chrono::DateTime;
use scraper::Html;
use tracing::{debug, info, warn};

use super::{build_client, Source};
use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::models::{sentinel, NewsItem};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

pub struct NewsFeedReader {
    config: FeedConfig,
}

impl NewsFeedReader {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn cap(&self) -> usize {
        self.config.cap
    }

    /// Feed items, or an empty list if anything went wrong.
    pub async fn fetch(&self) -> Vec<NewsItem> {
        match self.try_fetch().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to fetch feed {}: {}", self.config.name, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Source for NewsFeedReader {
    type Output = Vec<NewsItem>;

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn try_fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        info!("Fetching feed {} from {}", self.config.name, self.config.source.url);

        let client = build_client(&self.config.source)?;
        let resp = client.get(&self.config.source.url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status { status: resp.status().as_u16() });
        }

        let content = resp.bytes().await?;
        let items = parse_feed(&content, &self.config.name, self.config.cap)?;
        debug!("Fetched {} items from {}", items.len(), self.config.name);
        Ok(items)
    }
}

/// Parses an RSS 2.0 document, falling back to Atom, keeping at most `cap` entries.
pub fn parse_feed(content: &[u8], source: &str, cap: usize) -> Result<Vec<NewsItem>, FetchError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Ok(channel
            .items()
            .iter()
            .take(cap)
            .map(|item| from_rss_item(item, source))
            .collect());
    }

    if let Ok(feed) = atom_syndication::Feed::read_from(content) {
        return Ok(feed
            .entries()
            .iter()
            .take(cap)
            .map(|entry| from_atom_entry(entry, source))
            .collect());
    }

    Err(FetchError::Parse(format!("{} is neither RSS nor Atom", source)))
}

fn from_rss_item(item: &rss::Item, source: &str) -> NewsItem {
    let date = match item.pub_date() {
        Some(raw) => DateTime::parse_from_rfc2822(raw.trim())
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|_| raw.trim().to_string()),
        None => sentinel::NEWS_DATE.to_string(),
    };

    let description = item
        .description()
        .or_else(|| item.content())
        .map(strip_html)
        .unwrap_or_default();

    NewsItem {
        date,
        title: display_title(item.title()),
        description,
        link: item.link().unwrap_or(sentinel::NEWS_LINK).to_string(),
        source: source.to_string(),
    }
}

fn from_atom_entry(entry: &atom_syndication::Entry, source: &str) -> NewsItem {
    let date = entry
        .published()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| sentinel::NEWS_DATE.to_string());

    let description = entry
        .summary()
        .map(|s| s.as_str())
        .or_else(|| entry.content().and_then(|c| c.value()))
        .map(strip_html)
        .unwrap_or_default();

    NewsItem {
        date,
        title: display_title(Some(entry.title().as_str())),
        description,
        link: entry
            .links()
            .first()
            .map(|l| l.href().to_string())
            .unwrap_or_else(|| sentinel::NEWS_LINK.to_string()),
        source: source.to_string(),
    }
}

fn display_title(title: Option<&str>) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t.to_uppercase(),
        None => sentinel::NEWS_TITLE.to_string(),
    }
}

/// Plain text of an HTML fragment, text nodes joined by single spaces.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
