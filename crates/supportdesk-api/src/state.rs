//! Application state wiring all services together.
//!
//! AppState holds the concrete service instance used by both CLI and REST
//! API. The service is generic over the repository trait, but AppState
//! pins it to the concrete infra implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use supportdesk_core::resolver::{CompletionOptions, ReplyResolver};
use supportdesk_core::session::ChatService;
use supportdesk_infra::config::{load_config, resolve_data_dir};
use supportdesk_infra::provider_factory::build_provider;
use supportdesk_infra::sqlite::{DatabasePool, SqliteTurnRepository};
use supportdesk_types::config::AppConfig;

/// Concrete type alias for the service generic pinned to the infra
/// implementation.
pub type ConcreteChatService = ChatService<SqliteTurnRepository>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers. The storage handle and
/// resolver configuration are owned here and injected into the components
/// that need them; nothing reads ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, wire the resolver and service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("supportdesk.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let repo = SqliteTurnRepository::new(db_pool.clone());

        // Build the configured completion provider and the resolver on
        // top of it
        let provider = build_provider(&config.provider)?;
        let options = CompletionOptions {
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
            timeout: Duration::from_secs(config.provider.timeout_secs),
        };
        let resolver = ReplyResolver::new(config.resolver.clone(), options, provider);

        let chat_service = ChatService::new(repo, resolver);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
