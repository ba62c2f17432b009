//! OpenAI-compatible completion provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves OpenAI, Mistral, and any
//! other endpoint speaking the chat completions protocol via configurable
//! base URLs and factory functions.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

pub mod config;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;

use supportdesk_core::llm::CompletionProvider;
use supportdesk_types::llm::{
    CompletionError, CompletionRequest, CompletionResponse, MessageRole, Usage,
};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`. Same pattern as
/// [`super::anthropic::AnthropicProvider`].
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    /// Create an OpenAI provider.
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::new(config::openai_defaults(api_key, model))
    }

    /// Create a Mistral AI provider.
    pub fn mistral(api_key: &str, model: &str) -> Self {
        Self::new(config::mistral_defaults(api_key, model))
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic
    /// [`CompletionRequest`].
    fn build_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<CreateChatCompletionRequest, CompletionError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        // System message
        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        // Conversation messages
        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    },
                ),
                MessageRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    },
                ),
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessage {
                            content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                                msg.content.clone(),
                            )),
                            refusal: None,
                            name: None,
                            audio: None,
                            tool_calls: None,
                            function_call: None,
                        },
                    )
                }
            };
            messages.push(oai_msg);
        }

        // Use the model from the request if set, otherwise fall back to
        // the config default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        Ok(CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        })
    }
}

// OpenAiCompatibleProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state including the API key inside the
// async-openai Client.

impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let oai_request = self.build_request(request)?;

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        // Extract content from the first choice
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        // Extract usage
        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`CompletionError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> CompletionError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            // Check for known error types by code or type field
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                CompletionError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                CompletionError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                CompletionError::Overloaded(api_err.message.clone())
            } else {
                CompletionError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => CompletionError::AuthenticationFailed,
                    429 => CompletionError::RateLimited {
                        retry_after_ms: None,
                    },
                    529 => CompletionError::Overloaded(err.to_string()),
                    _ => CompletionError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                CompletionError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            CompletionError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => CompletionError::InvalidRequest(msg.clone()),
        _ => CompletionError::Provider {
            message: err.to_string(),
        },
    }
}
