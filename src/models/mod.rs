// src/models/mod.rs

//! Domain models for the bot.

mod command;
mod message;
mod post;

// Re-export all public types
pub use command::SlashCommand;
pub use message::{Block, ContextElement, Reply, TextObject};
pub use post::{PostRecord, RawPost};
