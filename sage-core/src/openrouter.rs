//! OpenRouter API client
//!
//! Submits an ordered message sequence to the OpenRouter chat completions
//! endpoint and parses the reply, including the provider-reported `usage`
//! block. Retry policy is deliberately absent; one exchange is one call.

use crate::http::get_client;
use crate::models::{ChatRequest, ChatResponse};
use anyhow::{Context, Result};

const CHAT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Send a chat completion request to the OpenRouter API
///
/// # Arguments
/// * `request` - The chat request payload
/// * `api_key` - OpenRouter API key
///
/// # Returns
/// The parsed response from the API
pub async fn chat_completion(request: &ChatRequest, api_key: &str) -> Result<ChatResponse> {
    let client = get_client();

    let response = client
        .post(CHAT_COMPLETIONS_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .context("Failed to send request to OpenRouter API")?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("OpenRouter API error {}: {}", status, text);
    }

    response
        .json()
        .await
        .context("Failed to parse OpenRouter API response")
}
