//! Slash command parser for the chat surface.
//!
//! Recognizes Telegram style commands (`/get_balance`, `/set_item_qty 2 rope`)
//! with an optional `@botname` suffix on the verb. Verbs match
//! case-insensitively; arguments are kept as raw text so numeric validation
//! and its error replies stay with the handlers.
use log::trace;

/// A parsed chat command with its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    GetBalance,
    SetBalance(Option<String>),
    RemainingSessions,
    /// Full breakdown, or the total in one denomination when named.
    GetCurrency(Option<String>),
    AddCurrency(String),
    GetItemQty(String),
    SetItemQty { qty: Option<String>, item: String },
    Unknown(String),
}

impl BotCommand {
    /// Commands that can change the ledger or catalog.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            BotCommand::SetBalance(_)
                | BotCommand::AddCurrency(_)
                | BotCommand::GetItemQty(_)
                | BotCommand::SetItemQty { .. }
        )
    }
}

/// Help text listing every command.
pub const HELP_TEXT: &str = "Commands:\n\
/get_balance - show your account balance\n\
/set_balance <amount> - set your account balance\n\
/remaining_sessions - sessions your balance covers\n\
/get_currency [denomination] - show your coin purse\n\
/add_currency <amount> - add coins, e.g. 5g 3s or 2 platinum\n\
/get_item_qty <item> - how many of an item you hold\n\
/set_item_qty <qty> <item> - set how many of an item you hold";

/// Command parser; optionally bound to the bot's own username so commands
/// addressed to another bot in a group (`/get_balance@OtherBot`) are ignored.
#[derive(Debug, Default, Clone)]
pub struct BotCommandParser {
    bot_username: Option<String>,
}

impl BotCommandParser {
    pub fn new() -> Self {
        Self { bot_username: None }
    }

    pub fn with_bot_username(username: &str) -> Self {
        let name = username.trim().trim_start_matches('@');
        Self {
            bot_username: (!name.is_empty()).then(|| name.to_string()),
        }
    }

    pub fn set_bot_username(&mut self, username: &str) {
        *self = Self::with_bot_username(username);
    }

    /// Parse a message text. `None` means the text is not a command for us.
    pub fn parse(&self, raw: &str) -> Option<BotCommand> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('/')?;
        let (head, args) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim()),
            None => (body, ""),
        };

        let verb = match head.split_once('@') {
            Some((verb, target)) => {
                if let Some(ref me) = self.bot_username {
                    if !target.eq_ignore_ascii_case(me) {
                        trace!("Ignoring command addressed to @{}", target);
                        return None;
                    }
                }
                verb
            }
            None => head,
        };
        if verb.is_empty() {
            return None;
        }

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" | "help" => BotCommand::Help,
            "get_balance" => BotCommand::GetBalance,
            "set_balance" => BotCommand::SetBalance(first_arg(args)),
            "remaining_sessions" => BotCommand::RemainingSessions,
            "get_currency" => BotCommand::GetCurrency(first_arg(args)),
            "add_currency" => BotCommand::AddCurrency(args.to_string()),
            "get_item_qty" => BotCommand::GetItemQty(args.to_string()),
            "set_item_qty" => {
                let (qty, item) = match args.find(char::is_whitespace) {
                    Some(idx) => (&args[..idx], args[idx..].trim()),
                    None => (args, ""),
                };
                BotCommand::SetItemQty {
                    qty: (!qty.is_empty()).then(|| qty.to_string()),
                    item: item.to_string(),
                }
            }
            other => BotCommand::Unknown(other.to_string()),
        };
        trace!("Parsed {:?} from '{}'", command, raw);
        Some(command)
    }
}

fn first_arg(args: &str) -> Option<String> {
    args.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        let p = BotCommandParser::new();
        assert_eq!(p.parse("hello there"), None);
        assert_eq!(p.parse("/"), None);
        assert_eq!(p.parse(""), None);
    }

    #[test]
    fn verbs_are_case_insensitive() {
        let p = BotCommandParser::new();
        assert_eq!(p.parse("/GET_BALANCE"), Some(BotCommand::GetBalance));
        assert_eq!(p.parse("  /help "), Some(BotCommand::Help));
        assert_eq!(p.parse("/start"), Some(BotCommand::Help));
    }

    #[test]
    fn set_balance_keeps_raw_argument() {
        let p = BotCommandParser::new();
        assert_eq!(
            p.parse("/set_balance abc"),
            Some(BotCommand::SetBalance(Some("abc".into())))
        );
        assert_eq!(p.parse("/set_balance"), Some(BotCommand::SetBalance(None)));
    }

    #[test]
    fn set_item_qty_splits_quantity_and_name() {
        let p = BotCommandParser::new();
        assert_eq!(
            p.parse("/set_item_qty 3   Healing  Potion"),
            Some(BotCommand::SetItemQty {
                qty: Some("3".into()),
                item: "Healing  Potion".into()
            })
        );
        assert_eq!(
            p.parse("/set_item_qty"),
            Some(BotCommand::SetItemQty {
                qty: None,
                item: String::new()
            })
        );
    }

    #[test]
    fn bot_suffix_is_checked_when_known() {
        let p = BotCommandParser::with_bot_username("@TinkerBot");
        assert_eq!(p.parse("/get_balance@tinkerbot"), Some(BotCommand::GetBalance));
        assert_eq!(p.parse("/get_balance@OtherBot"), None);

        let anon = BotCommandParser::new();
        assert_eq!(anon.parse("/get_balance@OtherBot"), Some(BotCommand::GetBalance));
    }

    #[test]
    fn unknown_and_mutating() {
        let p = BotCommandParser::new();
        assert_eq!(p.parse("/roll d20"), Some(BotCommand::Unknown("roll".into())));
        assert!(BotCommand::AddCurrency("5g".into()).is_mutating());
        assert!(!BotCommand::GetBalance.is_mutating());
    }
}
