//! Test utilities & fixtures.
//! Every fixture lives in its own temp data directory so tests never share files.

use tinkertales::bot::{BotCommandParser, BotContext, IncomingMessage, LedgerSettings};
use tinkertales::ledger::UserId;
use tinkertales::storage::Storage;

/// A context over a fresh, empty data directory. Keep the `TempDir` alive.
#[allow(dead_code)]
pub fn fresh_ledger() -> (tempfile::TempDir, BotContext) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let ctx = reopen(tmp.path());
    (tmp, ctx)
}

/// Load a new context from whatever is on disk in `dir`.
#[allow(dead_code)]
pub fn reopen(dir: &std::path::Path) -> BotContext {
    let storage = Storage::open(dir).expect("storage");
    BotContext::open(LedgerSettings::default(), storage).expect("context")
}

#[allow(dead_code)]
pub fn message(user_id: UserId, first_name: &str, username: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        user_id,
        first_name: first_name.to_string(),
        username: username.to_string(),
        chat_id: -1001,
        thread_id: Some(4),
        text: text.to_string(),
    }
}

/// Run `text` as user 42 ("Ada", @ada_l) and return the reply.
#[allow(dead_code)]
pub fn say(ctx: &mut BotContext, text: &str) -> Option<String> {
    let parser = BotCommandParser::with_bot_username("TinkerBot");
    tinkertales::bot::respond(ctx, &parser, &message(42, "Ada", "ada_l", text))
}
