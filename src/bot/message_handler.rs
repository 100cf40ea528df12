//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{Location, User};
use tracing::debug;

use crate::app::AppState;
use crate::identity::user_identity;
use crate::localization::{t_args_lang, t_lang};

use super::commands::Command;
use super::ui_builder::{
    create_menu_keyboard, create_reply_keyboard, create_start_keyboard, format_info_message,
};

/// Execute a command for `user` and send the reply to `chat_id`
pub async fn run_command(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    command: Command,
    state: &AppState,
) -> Result<()> {
    let language_code = user.language_code.as_deref();
    let identity = user_identity(user);
    debug!(user_id = %user.id, ?command, "Running command");

    let reply = match command {
        Command::Start => {
            state.register_user(&identity).await;
            bot.send_message(chat_id, format_info_message(language_code))
                .reply_markup(create_start_keyboard(language_code))
                .await?;
            bot.send_message(chat_id, t_lang("menu-available", language_code))
                .reply_markup(create_reply_keyboard(language_code))
                .await?;
            return Ok(());
        }
        Command::Menu => {
            bot.send_message(chat_id, t_lang("menu-prompt", language_code))
                .reply_markup(create_menu_keyboard(language_code))
                .await?;
            return Ok(());
        }
        Command::Info => format_info_message(language_code),
        Command::Search => {
            state
                .search_for_user(&identity, "location-not-set-search", language_code)
                .await
        }
        Command::SearchNearby => {
            state
                .search_for_user(&identity, "location-not-set-nearby", language_code)
                .await
        }
        Command::SearchForGroup => state.search_for_group(language_code).await,
        Command::ShowGroupInfo => state.group_info(language_code).await,
        Command::CurrentLocation => state.current_location(&identity, language_code).await,
        Command::UpdateLocation => t_lang("location-update-prompt", language_code),
        Command::RequestLocation => t_lang("location-request", language_code),
        Command::AddToGroup => t_lang("group-add-info", language_code),
        Command::RemoveFromGroup => t_lang("group-remove-info", language_code),
    };

    bot.send_message(chat_id, reply).await?;
    Ok(())
}

async fn handle_location_message(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    location: &Location,
    state: &AppState,
) -> Result<()> {
    debug!(user_id = %user.id, "Received location from user");
    let reply = state
        .record_location(
            &user_identity(user),
            location.latitude,
            location.longitude,
            user.language_code.as_deref(),
        )
        .await;
    bot.send_message(chat_id, reply).await?;
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    user: &User,
    text: &str,
    state: &AppState,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    if text.starts_with('/') {
        match Command::parse(text) {
            Some(command) => run_command(bot, msg.chat.id, user, command, state).await?,
            None => debug!(user_id = %msg.chat.id, "Ignoring unknown command"),
        }
        return Ok(());
    }

    let greeting = t_args_lang("greeting", &[("text", text)], user.language_code.as_deref());
    bot.send_message(msg.chat.id, greeting).await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without sender");
        return Ok(());
    };

    if let Some(location) = msg.location() {
        handle_location_message(&bot, msg.chat.id, user, location, &state).await?;
    } else if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, user, text, &state).await?;
    } else {
        debug!(user_id = %msg.chat.id, "Ignoring unsupported message type");
    }

    Ok(())
}
