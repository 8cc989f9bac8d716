pub mod gemini;
pub mod prompt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SummarizerConfig;
use crate::error::FetchError;
use crate::models::AggregateResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub model: String,
    pub text: String,
}

/// First configured candidate the service actually offers.
pub fn choose_model(candidates: &[String], available: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|c| available.iter().any(|a| a == *c))
        .cloned()
}

pub struct Summarizer {
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self { config }
    }

    fn client(&self) -> Result<Client, FetchError> {
        let client = Client::builder().timeout(self.config.timeout).build()?;
        Ok(client)
    }

    fn api_key(&self) -> Result<&str, FetchError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FetchError::Config("GEMINI_API_KEY is not set".to_string()))
    }

    /// Picks the model: first candidate present in the model listing, else
    /// the first candidate when the listing fails or matches nothing.
    /// Later candidates are never tried as a fallback, and a failed
    /// generation is not retried with another model.
    pub async fn resolve_model(&self) -> Result<String, FetchError> {
        let client = self.client()?;
        self.resolve_model_with(&client).await
    }

    async fn resolve_model_with(&self, client: &Client) -> Result<String, FetchError> {
        let fallback = self
            .config
            .models
            .first()
            .cloned()
            .ok_or_else(|| FetchError::Config("no Gemini model configured".to_string()))?;
        let api_key = self.api_key()?;

        match gemini::list_models(client, &self.config.base_url, api_key).await {
            Ok(available) => match choose_model(&self.config.models, &available) {
                Some(model) => Ok(model),
                None => {
                    warn!("None of {:?} listed by Gemini, using {}", self.config.models, fallback);
                    Ok(fallback)
                }
            },
            Err(e) => {
                warn!("Gemini model listing failed ({}), using {}", e, fallback);
                Ok(fallback)
            }
        }
    }

    /// Sends the refresh data to Gemini and returns its text verbatim.
    pub async fn summarize(&self, result: &AggregateResult) -> Result<Summary, FetchError> {
        let api_key = self.api_key()?;
        let client = self.client()?;
        let model = self.resolve_model_with(&client).await?;
        let prompt = prompt::build_summary_prompt(result);

        info!("Requesting summary from {}", model);
        let text = gemini::generate(&client, &self.config.base_url, api_key, &model, &prompt).await?;

        Ok(Summary { model, text })
    }
}
