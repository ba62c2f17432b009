//! Observability setup for supportdesk.

pub mod tracing_setup;
