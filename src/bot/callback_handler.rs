//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::app::AppState;

use super::commands::Command;
use super::message_handler::run_command;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    state: Arc<AppState>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    // Answer first so the button stops spinning while the search runs
    bot.answer_callback_query(q.id.clone()).await?;

    let command = q.data.as_deref().and_then(Command::from_callback_data);
    match (command, &q.message) {
        (Some(command), Some(msg)) => {
            run_command(&bot, msg.chat().id, &q.from, command, &state).await?;
        }
        (None, _) => debug!(user_id = %q.from.id, "Ignoring unknown callback data"),
        (Some(_), None) => debug!(user_id = %q.from.id, "Callback message is no longer available"),
    }

    Ok(())
}
