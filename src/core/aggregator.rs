use chrono::Utc;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::fetcher::calendar::CalendarFetcher;
use crate::fetcher::news::NewsFeedReader;
use crate::fetcher::price::{quote_from, PriceFetcher};
use crate::fetcher::Source;
use crate::models::{AggregateResult, SourceFailure, SourceKind};

/// Runs every source once, one after another, and merges what came back.
pub struct Aggregator {
    price: PriceFetcher,
    feeds: Vec<NewsFeedReader>,
    calendar: CalendarFetcher,
}

impl Aggregator {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            price: PriceFetcher::new(config.price.clone()),
            feeds: config.feeds.iter().cloned().map(NewsFeedReader::new).collect(),
            calendar: CalendarFetcher::new(config.calendar.clone()),
        }
    }

    /// One full refresh. Never fails: each source falls back to its
    /// sentinel value and the cause is kept in `failures`.
    pub async fn refresh(&self) -> AggregateResult {
        let fetched_at = Utc::now();
        let mut failures = Vec::new();

        // 1. Quote
        let outcome = self.price.try_fetch().await;
        if let Err(e) = &outcome {
            record(&mut failures, SourceKind::Price, self.price.name(), e);
        }
        let quote = quote_from(outcome);

        // 2. News, feed by feed in configured order
        let mut news = Vec::new();
        for feed in &self.feeds {
            match feed.try_fetch().await {
                Ok(items) => news.extend(items),
                Err(e) => record(&mut failures, SourceKind::News, feed.name(), &e),
            }
        }

        // 3. Calendar
        let calendar = self.calendar.try_fetch().await.unwrap_or_else(|e| {
            record(&mut failures, SourceKind::Calendar, self.calendar.name(), &e);
            Vec::new()
        });

        info!(
            "Aggregator: price={}, {} news, {} events, {} failures",
            quote.price,
            news.len(),
            calendar.len(),
            failures.len()
        );

        AggregateResult {
            fetched_at,
            quote,
            news,
            calendar,
            failures,
        }
    }
}

fn record(failures: &mut Vec<SourceFailure>, kind: SourceKind, source: &str, error: &FetchError) {
    warn!("Aggregator: {} failed: {}", source, error);
    failures.push(SourceFailure {
        kind,
        source: source.to_string(),
        error: error.to_string(),
    });
}
