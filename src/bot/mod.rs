//! Chat surface: command parsing, handlers and the Telegram polling loop.

pub mod commands;
pub mod context;
pub mod server;

pub use commands::{BotCommand, BotCommandParser, HELP_TEXT};
pub use context::{BotContext, IncomingMessage, LedgerSettings, STORAGE_FAILURE_REPLY};
pub use server::{incoming_from_update, respond, BotServer};
