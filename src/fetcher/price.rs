use async_trait::async_trait;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::{build_client, Source};
use crate::config::PriceConfig;
use crate::error::FetchError;
use crate::models::{sentinel, Quote};

pub struct PriceFetcher {
    config: PriceConfig,
}

impl PriceFetcher {
    pub fn new(config: PriceConfig) -> Self {
        Self { config }
    }

    /// Always returns a well-formed quote; failures become sentinel prices.
    pub async fn fetch(&self) -> Quote {
        quote_from(self.try_fetch().await)
    }

    /// Price text of the configured element, `None` when it is not on the page.
    pub fn extract_price(html: &str, selector: &str) -> Result<Option<String>, FetchError> {
        let selector = Selector::parse(selector)
            .map_err(|e| FetchError::Config(format!("bad price selector: {}", e)))?;
        let document = Html::parse_document(html);

        let element = match document.select(&selector).next() {
            Some(el) => el,
            None => return Ok(None),
        };

        let text = element.text().collect::<Vec<_>>().join("");
        let text = text.trim();
        if !text.is_empty() {
            return Ok(Some(text.to_string()));
        }

        // Streaming widgets sometimes render empty and carry the value as an attribute
        let attr = element
            .value()
            .attr("data-value")
            .or_else(|| element.value().attr("value"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Ok(attr)
    }
}

#[async_trait]
impl Source for PriceFetcher {
    type Output = Option<String>;

    fn name(&self) -> &str {
        "price"
    }

    async fn try_fetch(&self) -> Result<Option<String>, FetchError> {
        info!("Price Fetcher: Scraping {}", self.config.source.url);

        let client = build_client(&self.config.source)?;
        let resp = client.get(&self.config.source.url).send().await?;
        if resp.status() != StatusCode::OK {
            warn!("Price Fetcher: upstream answered {}", resp.status());
            return Err(FetchError::Blocked { status: resp.status().as_u16() });
        }

        let body = resp.text().await?;
        let price = Self::extract_price(&body, &self.config.selector())?;
        debug!("Price Fetcher: {:?}", price);
        Ok(price)
    }
}

/// Collapses a fetch outcome into the display quote, stamped with local time.
pub fn quote_from(outcome: Result<Option<String>, FetchError>) -> Quote {
    let timestamp = chrono::Local::now().format("%d.%m.%Y %H:%M:%S").to_string();

    match outcome {
        Ok(Some(price)) => Quote { timestamp, price, error: None },
        Ok(None) => Quote {
            timestamp,
            price: sentinel::PRICE_NOT_FOUND.to_string(),
            error: None,
        },
        Err(FetchError::Blocked { .. }) => Quote {
            timestamp,
            price: sentinel::PRICE_BLOCKED.to_string(),
            error: Some(sentinel::BLOCKED.to_string()),
        },
        Err(e) => Quote {
            timestamp,
            price: sentinel::PRICE_ERROR.to_string(),
            error: Some(e.to_string()),
        },
    }
}
