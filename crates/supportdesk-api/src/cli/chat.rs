//! One-shot chat command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Send one message to a session and print the reply.
///
/// # Examples
///
/// ```bash
/// sdesk ask customer-42 "How do I reset my password?"
/// sdesk ask customer-42 "I want a refund" --json
/// ```
pub async fn ask(state: &AppState, session_id: &str, query: &str, json: bool) -> Result<()> {
    let outcome = state.chat_service.handle_message(session_id, query).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "session_id": session_id,
                "response": outcome.response,
                "escalated": outcome.escalated,
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {}", outcome.response);
    if outcome.escalated {
        println!();
        println!(
            "  {} This conversation was escalated to a human agent.",
            style("!").yellow().bold()
        );
    }
    println!();

    Ok(())
}
