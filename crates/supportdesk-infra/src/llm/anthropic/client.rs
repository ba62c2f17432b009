//! AnthropicProvider -- concrete [`CompletionProvider`] implementation for
//! Anthropic Claude.
//!
//! Sends non-streaming requests to the Anthropic Messages API
//! (`/v1/messages`) with proper authentication headers.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use supportdesk_core::llm::CompletionProvider;
use supportdesk_types::llm::{
    CompletionError, CompletionRequest, CompletionResponse, Usage,
};

use super::types::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Anthropic Claude completion provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a new Anthropic provider.
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }
}

// AnthropicProvider intentionally does NOT derive Debug. The SecretString
// field ensures the API key is never printed, but we also omit Debug
// entirely.

impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => CompletionError::AuthenticationFailed,
                429 => CompletionError::RateLimited {
                    retry_after_ms: None,
                },
                529 => CompletionError::Overloaded(error_body),
                _ => CompletionError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let anthropic_resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Deserialization(format!("failed to parse response: {e}")))?;

        // Extract text content from the response
        let content = anthropic_resp
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            id: anthropic_resp.id,
            content,
            model: anthropic_resp.model,
            usage: Usage {
                input_tokens: anthropic_resp.usage.input_tokens,
                output_tokens: anthropic_resp.usage.output_tokens,
            },
        })
    }
}
