//! Completion provider implementations.
//!
//! Three backends, all implementing `CompletionProvider` from
//! supportdesk-core:
//! - [`anthropic`]: Anthropic Messages API over reqwest.
//! - [`openai_compat`]: any OpenAI-compatible chat completions endpoint
//!   via async-openai.
//! - [`scripted`]: deterministic in-process provider for development and
//!   tests.

pub mod anthropic;
pub mod openai_compat;
pub mod scripted;
