//! User identity used as the key into the location store.

use teloxide::types::User;

/// `@handle` when the user has a username, otherwise their full name
pub fn user_identity(user: &User) -> String {
    identity_from_parts(user.username.as_deref(), &user.full_name())
}

pub fn identity_from_parts(username: Option<&str>, full_name: &str) -> String {
    match username {
        Some(handle) if !handle.is_empty() => format!("@{handle}"),
        _ => full_name.to_string(),
    }
}
