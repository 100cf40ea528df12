//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

// Import localization
use crate::localization::t_lang;

use super::commands::Command;

fn button(
    label_key: &str,
    command: Command,
    language_code: Option<&str>,
) -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback(
        t_lang(label_key, language_code),
        command.callback_data(),
    )]
}

/// Inline keyboard sent with the welcome message
pub fn create_start_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        button("button-info", Command::Info, language_code),
        button("button-search", Command::Search, language_code),
        button("button-group-list", Command::ShowGroupInfo, language_code),
        button("button-group-search", Command::SearchForGroup, language_code),
    ])
}

/// Inline keyboard with every option, sent by /menu
pub fn create_menu_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        button("button-info", Command::Info, language_code),
        button("button-search-short", Command::Search, language_code),
        button("button-update-location", Command::RequestLocation, language_code),
        button("button-current-location", Command::CurrentLocation, language_code),
        button("button-group-list-long", Command::ShowGroupInfo, language_code),
        button("button-group-search", Command::SearchForGroup, language_code),
    ])
}

/// Persistent keyboard with the menu command and a location-sharing button
pub fn create_reply_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("/menu"),
        KeyboardButton::new(t_lang("button-update-location", language_code))
            .request(ButtonRequest::Location),
    ]])
    .resize_keyboard()
}

/// About text listing both modes and the main commands
pub fn format_info_message(language_code: Option<&str>) -> String {
    let commands = [
        ("button-info", "/info"),
        ("button-search-short", "/search"),
        ("button-update-location", "/update_location"),
        ("button-current-location", "/current_location"),
        ("button-group-list", "/show_group_info"),
        ("button-group-search", "/search_for_group"),
    ]
    .iter()
    .map(|(label_key, command)| format!("{}:\n{}", t_lang(label_key, language_code), command))
    .collect::<Vec<_>>()
    .join("\n\n");

    format!(
        "{}\n{}\n{}\n\n{}",
        t_lang("info-intro", language_code),
        t_lang("info-single-mode", language_code),
        t_lang("info-group-mode", language_code),
        commands
    )
}
