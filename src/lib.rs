pub mod config;
pub mod error;
pub mod models;
pub mod fetcher;
pub mod core;
pub mod llm;

pub use crate::config::DashboardConfig;
pub use crate::core::aggregator::Aggregator;
pub use crate::error::FetchError;
pub use crate::llm::{Summarizer, Summary};
pub use crate::models::{AggregateResult, CalendarEvent, NewsItem, Quote, SourceFailure, SourceKind};
