//! # Tinkertales - Ledger Bot for a Tabletop Community
//!
//! Tinkertales is a Telegram bot that keeps per-player records for a
//! tabletop gaming group: a dollar account balance used to pay for sessions,
//! an in-game coin purse and an item inventory.
//!
//! ## Features
//!
//! - **Account balance**: `/get_balance`, `/set_balance` and `/remaining_sessions`.
//! - **Coin purse**: stored as copper pieces and shown as platinum, gold, silver and copper.
//! - **Inventory**: `/get_item_qty` and `/set_item_qty` with fuzzy item name matching,
//!   so typos land on the existing catalog entry.
//! - **Flat file storage**: two JSON files, rewritten atomically under a file lock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tinkertales::bot::BotServer;
//! use tinkertales::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = BotServer::new(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`ledger`] - player and item records, currency arithmetic, fuzzy resolution
//! - [`storage`] - JSON persistence of the ledger and catalog
//! - [`bot`] - command parsing, handlers and the polling loop
//! - [`telegram`] - Bot API client
//! - [`config`] - configuration loading and validation
//! - [`logutil`] - log sanitizing helpers

pub mod bot;
pub mod config;
pub mod ledger;
pub mod logutil;
pub mod storage;
pub mod telegram;
