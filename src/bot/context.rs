//! Command handlers and the state they run against.
//!
//! [`BotContext`] owns the player ledger, the item catalog and the storage
//! they persist to. The server hands every parsed command to
//! [`BotContext::handle`] one at a time, which keeps each
//! read-mutate-persist-reply cycle from interleaving with another.
//!
//! Malformed numbers are validated before anything is touched, so a rejected
//! command leaves both stores exactly as they were. Players created by a
//! read-only command (first contact) are still persisted.

use log::{debug, info, warn};

use super::commands::{BotCommand, HELP_TEXT};
use crate::config::GeneralConfig;
use crate::ledger::{
    format_breakdown, format_coins, normalize_item_name, parse_currency, resolve_item,
    total_copper, Catalog, Denomination, LedgerError, Player, Players, UserId,
    MAX_ITEM_NAME_CHARS,
};
use crate::logutil::escape_log;
use crate::storage::Storage;

/// Reply when persistence fails; details go to the log only.
pub const STORAGE_FAILURE_REPLY: &str =
    "Something went wrong while saving; please try again later";

/// Sender and text of a chat message, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub user_id: UserId,
    pub first_name: String,
    pub username: String,
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub text: String,
}

/// Tunables the handlers need from `[general]`.
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub community_name: String,
    pub lv_threshold: u8,
    pub session_price: i64,
}

impl From<&GeneralConfig> for LedgerSettings {
    fn from(general: &GeneralConfig) -> Self {
        Self {
            community_name: general.community_name.clone(),
            lv_threshold: general.lv_threshold(),
            session_price: general.session_price,
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings::from(&GeneralConfig::default())
    }
}

/// Which stores a handler changed.
#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    players: bool,
    catalog: bool,
}

pub struct BotContext {
    settings: LedgerSettings,
    storage: Storage,
    players: Players,
    catalog: Catalog,
}

impl BotContext {
    /// Load both stores from `storage`.
    pub fn open(settings: LedgerSettings, storage: Storage) -> Result<Self, LedgerError> {
        let players = storage.load_players()?;
        let catalog = storage.load_catalog()?;
        info!(
            "Loaded {} player(s) and {} item(s) from {}",
            players.len(),
            catalog.len(),
            storage.base_dir().display()
        );
        Ok(Self::new(settings, storage, players, catalog))
    }

    pub fn new(
        settings: LedgerSettings,
        storage: Storage,
        players: Players,
        catalog: Catalog,
    ) -> Self {
        Self {
            settings,
            storage,
            players,
            catalog,
        }
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Seed catalog entries (e.g. from `init`) and persist if anything was added.
    pub fn seed_items<I, S>(&mut self, names: I) -> Result<usize, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.catalog.seed(
            names
                .into_iter()
                .map(|n| normalize_item_name(n.as_ref()))
                .filter(|n| !n.is_empty() && n.chars().count() <= MAX_ITEM_NAME_CHARS),
        );
        if added > 0 {
            self.storage.persist_catalog(&self.catalog)?;
        }
        Ok(added)
    }

    /// Run one command to completion and return the reply text.
    ///
    /// Only storage failures surface as `Err`; bad user input becomes a reply.
    pub fn handle(
        &mut self,
        msg: &IncomingMessage,
        command: BotCommand,
    ) -> Result<String, LedgerError> {
        debug!(
            "user {} ({}) -> {:?}{}",
            msg.user_id,
            escape_log(&msg.username),
            command,
            if command.is_mutating() { " [mutating]" } else { "" }
        );

        let snapshot = match command {
            BotCommand::Help | BotCommand::Unknown(_) => None,
            _ => Some((self.players.clone(), self.catalog.clone())),
        };

        let mut dirty = Dirty::default();
        let reply = match command {
            BotCommand::Help => HELP_TEXT.to_string(),
            BotCommand::GetBalance => self.get_balance(msg, &mut dirty),
            BotCommand::SetBalance(arg) => self.set_balance(msg, arg.as_deref(), &mut dirty),
            BotCommand::RemainingSessions => self.remaining_sessions(msg, &mut dirty),
            BotCommand::GetCurrency(denomination) => {
                self.get_currency(msg, denomination.as_deref(), &mut dirty)
            }
            BotCommand::AddCurrency(amount) => self.add_currency(msg, &amount, &mut dirty),
            BotCommand::GetItemQty(item) => self.get_item_qty(msg, &item, &mut dirty),
            BotCommand::SetItemQty { qty, item } => {
                self.set_item_qty(msg, qty.as_deref(), &item, &mut dirty)
            }
            BotCommand::Unknown(verb) => format!(
                "Unknown command /{}. Send /help for the list of commands.",
                verb
            ),
        };

        self.persist(dirty, snapshot)?;
        Ok(reply)
    }

    /// Write every dirty store. A store whose write fails is rolled back to
    /// `snapshot`, so memory always matches what is on disk.
    fn persist(
        &mut self,
        dirty: Dirty,
        snapshot: Option<(Players, Catalog)>,
    ) -> Result<(), LedgerError> {
        let players = if dirty.players {
            self.storage.persist_players(&self.players)
        } else {
            Ok(())
        };
        let catalog = if dirty.catalog {
            self.storage.persist_catalog(&self.catalog)
        } else {
            Ok(())
        };

        if let Some((players_before, catalog_before)) = snapshot {
            if players.is_err() {
                warn!("Rolling back player ledger after failed write");
                self.players = players_before;
            }
            if catalog.is_err() {
                warn!("Rolling back item catalog after failed write");
                self.catalog = catalog_before;
            }
        }
        players.and(catalog)
    }

    fn player(&mut self, msg: &IncomingMessage, dirty: &mut Dirty) -> &mut Player {
        let (player, created) =
            self.players
                .get_or_create(msg.user_id, &msg.first_name, &msg.username);
        if created {
            info!(
                "New player {} ({})",
                msg.user_id,
                escape_log(&msg.first_name)
            );
            dirty.players = true;
        }
        player
    }

    fn get_balance(&mut self, msg: &IncomingMessage, dirty: &mut Dirty) -> String {
        let community = self.settings.community_name.clone();
        let player = self.player(msg, dirty);
        format!(
            "{}: Your {} balance is ${}",
            player.first_name, community, player.account_balance
        )
    }

    fn set_balance(
        &mut self,
        msg: &IncomingMessage,
        arg: Option<&str>,
        dirty: &mut Dirty,
    ) -> String {
        let community = self.settings.community_name.clone();
        let new_balance = match arg.map(parse_integer::<i64>) {
            Some(Ok(value)) => value,
            _ => {
                return format!(
                    "You may only set your {} balance to a numerical value",
                    community
                )
            }
        };

        let player = self.player(msg, dirty);
        player.account_balance = new_balance;
        dirty.players = true;
        format!(
            "{}: Your {} balance has been set to ${}",
            player.first_name, community, player.account_balance
        )
    }

    fn remaining_sessions(&mut self, msg: &IncomingMessage, dirty: &mut Dirty) -> String {
        let price = self.settings.session_price;
        let player = self.player(msg, dirty);
        format!(
            "{}: You have sufficient account balance for {} D&D sessions",
            player.first_name,
            player.remaining_sessions(price)
        )
    }

    fn get_currency(
        &mut self,
        msg: &IncomingMessage,
        denomination: Option<&str>,
        dirty: &mut Dirty,
    ) -> String {
        let wanted = match denomination {
            Some(name) => match Denomination::lookup(name) {
                Some(d) => Some(d),
                None => {
                    return format!(
                        "Unknown denomination '{}'. Use platinum, gold, silver or copper",
                        name
                    )
                }
            },
            None => None,
        };

        let player = self.player(msg, dirty);
        match wanted {
            Some(d) => format!(
                "{}: You own {} {} in total",
                player.first_name,
                player.currency_in(d.name()),
                d
            ),
            None => format!(
                "{}: You own {}",
                player.first_name,
                format_breakdown(&player.currency_breakdown())
            ),
        }
    }

    fn add_currency(&mut self, msg: &IncomingMessage, amount: &str, dirty: &mut Dirty) -> String {
        let coins = match parse_currency(amount) {
            Ok(coins) => coins,
            Err(e) => {
                debug!("rejected amount '{}': {}", escape_log(amount), e);
                return "Amounts look like 5g 3s, 2 platinum 4 gold or a plain copper count"
                    .to_string();
            }
        };
        let increments: Vec<(&str, u64)> = coins.iter().map(|(d, n)| (d.name(), *n)).collect();

        let player = self.player(msg, dirty);
        player.add_currency(&increments);
        dirty.players = true;
        format!(
            "{}: Added {}. You own {}",
            player.first_name,
            format_coins(total_copper(&coins)),
            format_breakdown(&player.currency_breakdown())
        )
    }

    fn get_item_qty(&mut self, msg: &IncomingMessage, item: &str, dirty: &mut Dirty) -> String {
        let query = normalize_item_name(item);
        if query.is_empty() {
            return "Usage: /get_item_qty <item name>".to_string();
        }
        if let Some(reply) = name_too_long(&query) {
            return reply;
        }

        let resolved = resolve_item(&mut self.catalog, &query, self.settings.lv_threshold);
        dirty.catalog |= resolved.created();
        let player = self.player(msg, dirty);
        format!("{}x {}", player.item_qty(&resolved.item.name), resolved.item.name)
    }

    fn set_item_qty(
        &mut self,
        msg: &IncomingMessage,
        qty: Option<&str>,
        item: &str,
        dirty: &mut Dirty,
    ) -> String {
        let query = normalize_item_name(item);
        let qty = match qty {
            Some(raw) if !query.is_empty() => parse_integer::<u64>(raw),
            _ => return "Usage: /set_item_qty <qty> <item name>".to_string(),
        };
        if let Some(reply) = name_too_long(&query) {
            return reply;
        }
        let qty = match qty {
            Ok(qty) => qty,
            Err(_) => return format!("The qty of {} must be an integer", query),
        };

        let resolved = resolve_item(&mut self.catalog, &query, self.settings.lv_threshold);
        dirty.catalog |= resolved.created();
        let player = self.player(msg, dirty);
        player.set_item_qty(&resolved.item.name, qty);
        dirty.players = true;

        let who = if player.username.is_empty() {
            player.first_name.as_str()
        } else {
            player.username.as_str()
        };
        format!(
            "The qty of {} has been set to {} for {}",
            resolved.item.name, qty, who
        )
    }
}

fn name_too_long(name: &str) -> Option<String> {
    (name.chars().count() > MAX_ITEM_NAME_CHARS).then(|| {
        format!(
            "Item names are limited to {} characters",
            MAX_ITEM_NAME_CHARS
        )
    })
}

/// Parse an integer argument, reporting the raw text on failure.
pub fn parse_integer<T: std::str::FromStr>(raw: &str) -> Result<T, LedgerError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| LedgerError::InvalidNumber(raw.to_string()))
}
