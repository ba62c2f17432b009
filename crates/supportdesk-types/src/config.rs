//! Configuration types for supportdesk.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! HTTP server, the completion provider, and the reply resolver rules.
//! Every field has a shipped default so the service runs with no config
//! file at all.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level configuration, loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Backend type for the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    Anthropic,
    /// Deterministic in-process provider for development and tests.
    Scripted,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAiCompatible => write!(f, "openai_compatible"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Scripted => write!(f, "scripted"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "scripted" => Ok(ProviderKind::Scripted),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

/// Completion provider settings.
///
/// The API key is resolved from the environment variable named in
/// `api_key_env` at startup; it is never stored in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_kind")]
    pub kind: ProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override the provider's default base URL (proxies, self-hosted
    /// compatible endpoints).
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single completion call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_kind() -> ProviderKind {
    ProviderKind::Scripted
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "SUPPORTDESK_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.5
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One FAQ entry: a match phrase and its canned answer.
///
/// Entries are scanned in file order and the first match wins, so the
/// config file is the single source of priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub phrase: String,
    pub answer: String,
}

/// Reply resolver rules: escalation triggers, the FAQ table, and the
/// completion fallback's fixed strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// System instruction prefixed to every completion prompt.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Fixed reply sent when a conversation is handed off to a human.
    #[serde(default = "default_handoff_message")]
    pub handoff_message: String,

    /// Exact provider output that signals an escalation.
    #[serde(default = "default_escalation_sentinel")]
    pub escalation_sentinel: String,

    /// Tokens that escalate immediately when the lowercased query
    /// contains any of them.
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,

    /// Ordered FAQ table; first matching phrase wins.
    #[serde(default = "default_faq")]
    pub faq: Vec<FaqEntry>,
}

fn default_system_prompt() -> String {
    "You are a customer support assistant for TechFlow. Answer politely \
     using the conversation history for context. If the user is angry, \
     abusive, or asks a question you cannot answer from the FAQ, reply \
     with exactly: \"ACTION: ESCALATE_TO_AGENT\" and nothing else."
        .to_string()
}

fn default_handoff_message() -> String {
    "I am unable to resolve this issue based on my current instructions. \
     I am transferring you to a human agent now."
        .to_string()
}

fn default_escalation_sentinel() -> String {
    "ACTION: ESCALATE_TO_AGENT".to_string()
}

fn default_triggers() -> Vec<String> {
    ["human", "manager", "supervisor", "real person"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_faq() -> Vec<FaqEntry> {
    [
        (
            "reset password",
            "Go to Settings > Security > Reset to reset your password.",
        ),
        (
            "pricing",
            "The Basic Plan is $10/mo and the Pro Plan is $20/mo.",
        ),
        (
            "refund",
            "Refunds take 3-5 business days. Contact billing@techflow.com.",
        ),
        ("hours", "Support is available 9 AM - 5 PM EST."),
    ]
    .into_iter()
    .map(|(phrase, answer)| FaqEntry {
        phrase: phrase.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            handoff_message: default_handoff_message(),
            escalation_sentinel: default_escalation_sentinel(),
            triggers: default_triggers(),
            faq: default_faq(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.kind, ProviderKind::Scripted);
        assert!((config.provider.temperature - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.resolver.escalation_sentinel, "ACTION: ESCALATE_TO_AGENT");
        assert_eq!(config.resolver.faq.len(), 4);
    }

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in [
            ProviderKind::OpenAiCompatible,
            ProviderKind::Anthropic,
            ProviderKind::Scripted,
        ] {
            let s = kind.to_string();
            let parsed: ProviderKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_provider_kind_serde() {
        let json = serde_json::to_string(&ProviderKind::OpenAiCompatible).unwrap();
        assert_eq!(json, "\"openai_compatible\"");
        let parsed: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ProviderKind::OpenAiCompatible);
    }

    #[test]
    fn test_faq_order_preserved_from_toml() {
        let toml_str = r#"
[[resolver.faq]]
phrase = "shipping"
answer = "Ships in 2 days."

[[resolver.faq]]
phrase = "ship"
answer = "More general shipping answer."
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.resolver.faq.len(), 2);
        assert_eq!(config.resolver.faq[0].phrase, "shipping");
        assert_eq!(config.resolver.faq[1].phrase, "ship");
    }

    #[test]
    fn test_provider_config_from_toml() {
        let toml_str = r#"
[provider]
kind = "anthropic"
model = "claude-sonnet-4-20250514"
api_key_env = "ANTHROPIC_API_KEY"
timeout_secs = 10
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Anthropic);
        assert_eq!(config.provider.model, "claude-sonnet-4-20250514");
        assert_eq!(config.provider.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.provider.timeout_secs, 10);
        // Untouched sections keep their defaults
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_app_config_serde_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.resolver.triggers, config.resolver.triggers);
        assert_eq!(parsed.resolver.faq, config.resolver.faq);
    }
}
