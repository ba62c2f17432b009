//! Build a completion provider from configuration.
//!
//! Resolves the API key from the environment variable named in the
//! provider config; credentials are never read from the config file
//! itself.

use anyhow::{Context, Result};
use secrecy::SecretString;

use supportdesk_core::llm::BoxCompletionProvider;
use supportdesk_types::config::{ProviderConfig, ProviderKind};

use crate::llm::anthropic::AnthropicProvider;
use crate::llm::openai_compat::{config::openai_defaults, OpenAiCompatibleProvider};
use crate::llm::scripted::ScriptedProvider;

/// Construct the configured completion provider behind dynamic dispatch.
pub fn build_provider(config: &ProviderConfig) -> Result<BoxCompletionProvider> {
    match config.kind {
        ProviderKind::Scripted => Ok(BoxCompletionProvider::new(ScriptedProvider::new())),

        ProviderKind::OpenAiCompatible => {
            let api_key = api_key_from_env(config)?;
            let mut compat = openai_defaults(&api_key, &config.model);
            if let Some(ref base_url) = config.base_url {
                compat.base_url = base_url.clone();
            }
            Ok(BoxCompletionProvider::new(OpenAiCompatibleProvider::new(
                compat,
            )))
        }

        ProviderKind::Anthropic => {
            let api_key = api_key_from_env(config)?;
            let mut provider = AnthropicProvider::new(SecretString::from(api_key));
            if let Some(ref base_url) = config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxCompletionProvider::new(provider))
        }
    }
}

fn api_key_from_env(config: &ProviderConfig) -> Result<String> {
    std::env::var(&config.api_key_env).with_context(|| {
        format!(
            "environment variable '{}' not set for provider '{}'",
            config.api_key_env, config.kind
        )
    })
}
