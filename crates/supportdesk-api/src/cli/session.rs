//! Session browsing CLI commands: transcript and listing.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use supportdesk_types::turn::TurnRole;

use crate::state::AppState;

/// Print the transcript of a session.
///
/// # Examples
///
/// ```bash
/// sdesk history customer-42
/// sdesk history customer-42 --json
/// ```
pub async fn history(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let turns = state.chat_service.history(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!(
            "  {} No turns recorded for '{}'. Start with: {}",
            style("i").blue().bold(),
            style(session_id).cyan(),
            style(format!("sdesk ask {session_id} \"...\"")).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  Transcript for '{}'", style(session_id).cyan().bold());
    println!();

    for turn in &turns {
        let label = match turn.role {
            TurnRole::User => style("you").cyan().bold(),
            TurnRole::Assistant => style("bot").green().bold(),
        };
        let timestamp = turn
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!("  {} {}  {}", label, style(timestamp).dim(), turn.content);
    }

    println!();
    println!(
        "  {} turn{}",
        style(turns.len()).bold(),
        if turns.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// List known sessions with turn counts and last activity.
///
/// # Examples
///
/// ```bash
/// sdesk sessions
/// sdesk sessions --limit 10 --json
/// ```
pub async fn list_sessions(state: &AppState, limit: i64, json: bool) -> Result<()> {
    let sessions = state.chat_service.sessions(Some(limit), None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  {} No sessions recorded yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Last activity").fg(Color::White),
    ]);

    for session in &sessions {
        let last_activity = session
            .last_activity
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&session.session_id).fg(Color::Cyan),
            Cell::new(session.turn_count.to_string()).fg(Color::White),
            Cell::new(last_activity).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
