//! supportdesk CLI and REST API entry point.
//!
//! Binary name: `sdesk`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,supportdesk=debug",
        _ => "trace",
    };

    supportdesk_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Initialize application state (DB, provider, resolver, service)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(addr = %addr, "supportdesk API listening");

            println!(
                "  {} supportdesk API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Ask { session_id, query } => {
            cli::chat::ask(&state, &session_id, &query, cli.json).await?;
        }

        Commands::History { session_id } => {
            cli::session::history(&state, &session_id, cli.json).await?;
        }

        Commands::Sessions { limit } => {
            cli::session::list_sessions(&state, limit, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }
    }

    supportdesk_observe::tracing_setup::shutdown_tracing();

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
