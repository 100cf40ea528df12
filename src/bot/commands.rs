//! Commands understood by the bot, from slash commands and inline keyboard callbacks

/// Something the user asked the bot to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Info,
    Search,
    SearchNearby,
    SearchForGroup,
    ShowGroupInfo,
    CurrentLocation,
    UpdateLocation,
    /// Inline "update location" button: points at the keyboard location button
    RequestLocation,
    AddToGroup,
    RemoveFromGroup,
}

impl Command {
    /// Parse a slash command, accepting the `/command@bot_name` form and trailing arguments
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim_start().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _bot)| name);

        let command = match name {
            "start" => Command::Start,
            "menu" => Command::Menu,
            "info" => Command::Info,
            "search" => Command::Search,
            "search_nearby" => Command::SearchNearby,
            "search_for_group" => Command::SearchForGroup,
            "status_group" | "show_group_info" => Command::ShowGroupInfo,
            "current_location" => Command::CurrentLocation,
            "update_location" => Command::UpdateLocation,
            "add_to_group" => Command::AddToGroup,
            "remove_from_group" => Command::RemoveFromGroup,
            _ => return None,
        };
        Some(command)
    }

    /// Map inline keyboard callback data to a command
    pub fn from_callback_data(data: &str) -> Option<Self> {
        let command = match data {
            "info" => Command::Info,
            "search" => Command::Search,
            "update_location" => Command::RequestLocation,
            "current_location" => Command::CurrentLocation,
            "status_group" | "show_group_info" => Command::ShowGroupInfo,
            "search_for_group" => Command::SearchForGroup,
            _ => return None,
        };
        Some(command)
    }

    /// Callback data carried by inline buttons for this command
    pub fn callback_data(&self) -> &'static str {
        match self {
            Command::Info => "info",
            Command::Search | Command::SearchNearby => "search",
            Command::RequestLocation | Command::UpdateLocation => "update_location",
            Command::CurrentLocation => "current_location",
            Command::ShowGroupInfo => "show_group_info",
            Command::SearchForGroup => "search_for_group",
            Command::Start => "start",
            Command::Menu => "menu",
            Command::AddToGroup => "add_to_group",
            Command::RemoveFromGroup => "remove_from_group",
        }
    }
}
