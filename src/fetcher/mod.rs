use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::warn;

use crate::config::SourceConfig;
use crate::error::FetchError;

pub mod price;
pub mod news;
pub mod calendar;

/// One upstream the dashboard reads from.
#[async_trait]
pub trait Source: Send + Sync {
    type Output: Send;

    fn name(&self) -> &str;
    async fn try_fetch(&self) -> Result<Self::Output, FetchError>;
}

/// Client carrying the source's headers and timeout. Headers that are not
/// valid HTTP are skipped with a warning.
pub(crate) fn build_client(source: &SourceConfig) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &source.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid header {:?}", name),
        }
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(source.timeout)
        .build()?;
    Ok(client)
}
