use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

/// Model identifiers available to the key, without the `models/` prefix.
pub async fn list_models(client: &Client, base_url: &str, api_key: &str) -> Result<Vec<String>, FetchError> {
    let url = format!("{}/v1beta/models", base_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .query(&[("key", api_key)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status { status: response.status().as_u16() });
    }

    let list: ModelList = response
        .json()
        .await
        .map_err(|e| FetchError::Parse(format!("Failed to parse Gemini model list: {}", e)))?;

    Ok(list
        .models
        .into_iter()
        .map(|m| m.name.trim_start_matches("models/").to_string())
        .collect())
}

/// Generate a response with the Gemini `generateContent` endpoint.
pub async fn generate(
    client: &Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, FetchError> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );

    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    };

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status { status: response.status().as_u16() });
    }

    let result: GenerateResponse = response
        .json()
        .await
        .map_err(|e| FetchError::Parse(format!("Failed to parse Gemini response: {}", e)))?;

    result
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
        .find(|text| !text.is_empty())
        .ok_or_else(|| FetchError::Parse("No response from Gemini".to_string()))
}
