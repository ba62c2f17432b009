//! Shared domain types for supportdesk.
//!
//! Conversation turns, completion provider types, the error taxonomy,
//! and configuration structures. This crate has no I/O; implementations
//! live in supportdesk-infra.

pub mod config;
pub mod error;
pub mod llm;
pub mod turn;
