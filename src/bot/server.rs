//! Telegram polling loop.
//!
//! Updates are fetched with long polling and handled strictly one after the
//! other, so the ledger never sees two commands at once. The loop stops on
//! Ctrl-C; a failed poll backs off before retrying instead of exiting.

use anyhow::Result;
use log::{debug, error, info, warn};
use std::time::Duration;

use super::commands::BotCommandParser;
use super::context::{BotContext, IncomingMessage, LedgerSettings, STORAGE_FAILURE_REPLY};
use crate::config::Config;
use crate::logutil::escape_log;
use crate::storage::Storage;
use crate::telegram::{TelegramClient, Update};

const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub struct BotServer {
    config: Config,
    ctx: BotContext,
    client: TelegramClient,
    parser: BotCommandParser,
    offset: Option<i64>,
}

impl BotServer {
    /// Open the data directory and load both stores.
    pub fn new(config: Config) -> Result<Self> {
        let storage = Storage::open(config.general.data_dir())?;
        let ctx = BotContext::open(LedgerSettings::from(&config.general), storage)?;
        let client = TelegramClient::new(&config.telegram, &config.secrets);
        Ok(Self {
            config,
            ctx,
            client,
            parser: BotCommandParser::new(),
            offset: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.config.validate_for_start()?;

        let me = self.client.get_me().await?;
        match me.username.as_deref() {
            Some(name) => {
                info!("Connected to Telegram as @{}", name);
                self.parser.set_bot_username(name);
            }
            None => warn!("Bot account has no username; accepting every /cmd@name"),
        }
        info!(
            "{} ledger bot running (data dir {})",
            self.config.general.community_name,
            self.config.general.data_dir()
        );

        let mut backoff = MIN_BACKOFF;
        loop {
            let polled = tokio::select! {
                polled = self.client.get_updates(self.offset) => polled,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            };

            match polled {
                Ok(updates) => {
                    backoff = MIN_BACKOFF;
                    for update in updates {
                        self.offset = Some(update.update_id + 1);
                        self.dispatch(&update).await;
                    }
                }
                Err(e) => {
                    warn!("Polling failed: {}; retrying in {:?}", e, backoff);
                    tokio::select! {
                        _ = tokio::time::sleep(backoff) => {}
                        _ = tokio::signal::ctrl_c() => {
                            info!("Received shutdown signal");
                            break;
                        }
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }

        info!("Ledger bot stopped");
        Ok(())
    }

    async fn dispatch(&mut self, update: &Update) {
        let Some(msg) = incoming_from_update(update) else {
            debug!("skipping update {} (no text or sender)", update.update_id);
            return;
        };
        let Some(reply) = respond(&mut self.ctx, &self.parser, &msg) else {
            return;
        };
        if let Err(e) = self
            .client
            .send_message(msg.chat_id, &reply, msg.thread_id)
            .await
        {
            error!("Failed to send reply to chat {}: {}", msg.chat_id, e);
        }
    }

    pub fn show_status(&self) {
        println!("=== {} Ledger Status ===", self.config.general.community_name);
        println!("Data dir: {}", self.config.general.data_dir());
        println!("Players: {}", self.ctx.players().len());
        println!("Items: {}", self.ctx.catalog().len());
        println!("Fuzzy threshold: {}", self.config.general.lv_threshold());
        println!("Session price: ${}", self.config.general.session_price);
    }
}

/// Extract the fields the handlers need. Updates without text, without a
/// sender, or sent by another bot are skipped.
pub fn incoming_from_update(update: &Update) -> Option<IncomingMessage> {
    let message = update.message.as_ref()?;
    let text = message.text.as_ref()?;
    let from = message.from.as_ref()?;
    if from.is_bot {
        return None;
    }
    Some(IncomingMessage {
        user_id: from.id,
        first_name: from.first_name.clone(),
        username: from.username.clone().unwrap_or_default(),
        chat_id: message.chat.id,
        thread_id: message.message_thread_id,
        text: text.clone(),
    })
}

/// Parse and handle one message. `None` means there is nothing to send.
///
/// Storage failures are logged and answered with a generic reply.
pub fn respond(
    ctx: &mut BotContext,
    parser: &BotCommandParser,
    msg: &IncomingMessage,
) -> Option<String> {
    let command = parser.parse(&msg.text)?;
    match ctx.handle(msg, command) {
        Ok(reply) => Some(reply),
        Err(e) => {
            error!(
                "Command '{}' from user {} failed: {}",
                escape_log(&msg.text),
                msg.user_id,
                e
            );
            Some(STORAGE_FAILURE_REPLY.to_string())
        }
    }
}
