//! Source code for Link Cleaner Bot, a bot that keeps a single group chat
//! free of links and join/leave noise.

/// Environment configuration.
mod config;

/// Various types used throughout.
mod types;

/// The settings database.
mod database;

/// Miscellaneous functions, mostly link detection and name printing.
mod misc;

/// Functions that perform stuff via the bot.
mod actions;

/// Functions that handle events from Telegram.
mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
