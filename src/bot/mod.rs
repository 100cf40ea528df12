//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: Slash commands and inline callback data
//! - `message_handler`: Handles commands, shared locations and plain text
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod commands;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use commands::Command;
