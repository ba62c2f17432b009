//! Status command: configuration summary and storage counts.

use anyhow::Result;
use console::style;

use supportdesk_core::session::repository::TurnRepository;

use crate::state::AppState;

/// Show the data directory, provider configuration, resolver rule counts,
/// and aggregate storage counts.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let repo = state.chat_service.repo();
    let total_sessions = repo.count_sessions().await?;
    let total_turns = repo.count_turns().await?;

    if json {
        let status = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "provider": state.config.provider.kind.to_string(),
            "model": state.config.provider.model,
            "faq_entries": state.config.resolver.faq.len(),
            "escalation_triggers": state.config.resolver.triggers.len(),
            "total_sessions": total_sessions,
            "total_turns": total_turns,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} supportdesk status", style("*").bold());
    println!();
    println!("  Data dir:   {}", style(state.data_dir.display()).cyan());
    println!(
        "  Provider:   {} ({})",
        style(&state.config.provider.kind).cyan(),
        state.config.provider.model
    );
    println!(
        "  Resolver:   {} FAQ entries, {} escalation triggers",
        state.config.resolver.faq.len(),
        state.config.resolver.triggers.len()
    );
    println!(
        "  Storage:    {} sessions, {} turns",
        style(total_sessions).bold(),
        style(total_turns).bold()
    );
    println!();

    Ok(())
}
