//! Log-safe rendering of chat text.
//!
//! Telegram messages and names can carry newlines, control bytes and
//! invisible formatting characters (zero-width spaces, bidi overrides) that
//! make a log line lie about what the user typed. [`escape_log`] renders all
//! of them visibly and caps the preview at one item name's worth of text.

use std::fmt::Write;

use crate::ledger::MAX_ITEM_NAME_CHARS;

/// Longest preview of user text written to the log.
const MAX_PREVIEW: usize = MAX_ITEM_NAME_CHARS * 2;

/// Zero-width and bidirectional formatting characters.
fn is_invisible_format(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}

/// Render `s` on one line: `\n`, `\r`, `\t` and backslash are escaped, other
/// control bytes become `\xNN` and invisible formatting becomes `\u{NNNN}`.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if is_invisible_format(c) => {
                let _ = write!(out, "\\u{{{:04X}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
