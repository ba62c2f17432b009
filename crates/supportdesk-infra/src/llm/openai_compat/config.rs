//! Configuration and per-provider defaults for OpenAI-compatible providers.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL.

/// Configuration for an OpenAI-compatible completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "mistral").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
    }
}

/// Mistral AI default configuration.
///
/// Base URL: `https://api.mistral.ai/v1`
pub fn mistral_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "mistral".into(),
        base_url: "https://api.mistral.ai/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
    }
}
