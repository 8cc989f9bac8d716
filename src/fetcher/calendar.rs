use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{build_client, Source};
use crate::config::CalendarConfig;
use crate::error::FetchError;
use crate::models::{sentinel, CalendarEvent};

const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DISPLAY_FORMAT: &str = "%d.%m. %H:%M";

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    result: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    date: String,
    country: Option<String>,
    title: Option<String>,
    #[serde(default)]
    actual: Value,
    #[serde(default)]
    forecast: Value,
    #[serde(default)]
    previous: Value,
}

pub struct CalendarFetcher {
    config: CalendarConfig,
}

impl CalendarFetcher {
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    /// Events in the coming window, or an empty list on any failure.
    pub async fn fetch(&self) -> Vec<CalendarEvent> {
        match self.try_fetch().await {
            Ok(events) => events,
            Err(e) => {
                warn!("Calendar Fetcher: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_at(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, FetchError> {
        let (from, to) = calendar_window(now, self.config.window_days);
        info!("Calendar Fetcher: Requesting events from {} to {}", from, to);

        let countries = self.config.countries.join(",");
        let client = build_client(&self.config.source)?;
        let resp = client
            .get(&self.config.source.url)
            .query(&[
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("countries", countries.as_str()),
                ("importance", self.config.importance.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status { status: resp.status().as_u16() });
        }

        let body = resp.text().await?;
        let events = parse_events(&body)?;
        debug!("Calendar Fetcher: {} events", events.len());
        Ok(events)
    }
}

#[async_trait]
impl Source for CalendarFetcher {
    type Output = Vec<CalendarEvent>;

    fn name(&self) -> &str {
        "calendar"
    }

    async fn try_fetch(&self) -> Result<Vec<CalendarEvent>, FetchError> {
        self.try_fetch_at(Utc::now()).await
    }
}

/// `from` is the start of `now`'s UTC day, `to` the last second of the UTC
/// day `days` later.
pub fn calendar_window(now: DateTime<Utc>, days: i64) -> (String, String) {
    let start = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let end = (now.date_naive() + Duration::days(days))
        .and_hms_opt(23, 59, 59)
        .unwrap_or_default()
        .and_utc();

    (
        start.format(WINDOW_FORMAT).to_string(),
        end.format(WINDOW_FORMAT).to_string(),
    )
}

/// Reshapes the `result` rows of a calendar response. A missing `result` is
/// an empty calendar; a body that is not a JSON object is a parse error.
pub fn parse_events(body: &str) -> Result<Vec<CalendarEvent>, FetchError> {
    let data: CalendarResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    data.result.into_iter().map(reshape).collect()
}

fn reshape(raw: RawEvent) -> Result<CalendarEvent, FetchError> {
    Ok(CalendarEvent {
        time: display_time(&raw.date)?,
        country: raw.country.unwrap_or_else(|| sentinel::MISSING_VALUE.to_string()),
        event: raw.title.unwrap_or_else(|| sentinel::EVENT_TITLE.to_string()),
        actual: display_value(&raw.actual),
        forecast: display_value(&raw.forecast),
        previous: display_value(&raw.previous),
    })
}

fn display_time(raw: &str) -> Result<String, FetchError> {
    let normalized = match raw.strip_suffix('Z') {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string())
        .map_err(|e| FetchError::Timestamp(format!("{}: {}", raw, e)))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => sentinel::MISSING_VALUE.to_string(),
        Value::String(s) if s.trim().is_empty() => sentinel::MISSING_VALUE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
