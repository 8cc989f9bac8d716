//! Plain-text rendering of a refresh.

use std::fmt;

use crate::error::FetchError;
use crate::llm::Summary;
use crate::models::{AggregateResult, SourceKind};

const TITLE_WIDTH: usize = 60;
const DESCRIPTION_WIDTH: usize = 100;
const EVENT_WIDTH: usize = 40;

pub fn render(result: &AggregateResult) -> String {
    Report(result).to_string()
}

pub fn render_summary(summary: &Result<Summary, FetchError>) -> String {
    match summary {
        Ok(s) => format!("\nAI MARKET SUMMARY ({})\n{}\n{}\n", s.model, "-".repeat(78), s.text),
        Err(e) => format!("\nAI summary failed: {}\n", e),
    }
}

struct Report<'a>(&'a AggregateResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "GOLD MARKET DASHBOARD  (updated {})", result.quote.timestamp)?;
        writeln!(f, "{}", "=".repeat(78))?;

        // Quote: the error path is chosen purely on the presence of `error`
        match &result.quote.error {
            Some(error) => writeln!(f, "Gold price unavailable ({}): {}", result.quote.price, error)?,
            None => writeln!(f, "Gold price: {}", result.quote.price)?,
        }

        self.news(f)?;
        self.calendar(f)
    }
}

impl Report<'_> {
    fn news(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "\nNEWS")?;
        writeln!(f, "{}", "-".repeat(78))?;
        if result.news.is_empty() {
            return self.empty(f, SourceKind::News, "No news available.");
        }

        for item in &result.news {
            writeln!(f, "{:<16} | {}", item.date, clip(&item.title, TITLE_WIDTH))?;
            if !item.description.is_empty() {
                writeln!(f, "{:<16} | {}", "", clip(&item.description, DESCRIPTION_WIDTH))?;
            }
            writeln!(f, "{:<16} | {}", item.source, item.link)?;
        }
        for failure in result.failures_of(SourceKind::News) {
            writeln!(f, "({} unavailable: {})", failure.source, failure.error)?;
        }
        Ok(())
    }

    fn calendar(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "\nECONOMIC CALENDAR (high impact, next 7 days)")?;
        writeln!(f, "{}", "-".repeat(78))?;
        if result.calendar.is_empty() {
            return self.empty(f, SourceKind::Calendar, "No scheduled events.");
        }

        writeln!(
            f,
            "{:<12} | {:<4} | {:<40} | {:>8} | {:>8} | {:>8}",
            "Time", "Ctry", "Event", "Actual", "Forecast", "Previous"
        )?;
        for event in &result.calendar {
            writeln!(
                f,
                "{:<12} | {:<4} | {:<40} | {:>8} | {:>8} | {:>8}",
                event.time,
                event.country,
                clip(&event.event, EVENT_WIDTH),
                event.actual,
                event.forecast,
                event.previous
            )?;
        }
        Ok(())
    }

    /// "no data" and "fetch failed" are told apart through the recorded failures.
    fn empty(&self, f: &mut fmt::Formatter<'_>, kind: SourceKind, neutral: &str) -> fmt::Result {
        let mut failures = self.0.failures_of(kind).peekable();
        if failures.peek().is_none() {
            return writeln!(f, "{}", neutral);
        }
        for failure in failures {
            writeln!(f, "{} unavailable: {}", failure.source, failure.error)?;
        }
        Ok(())
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}
