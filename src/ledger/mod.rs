//! Player ledger and item catalog.
//! Record types, coin purse arithmetic and fuzzy item name resolution. The
//! types here are plain in-memory maps; [`crate::storage`] handles the JSON
//! files they are loaded from and persisted to.

pub mod currency;
pub mod errors;
pub mod fuzzy;
pub mod resolver;
pub mod types;

pub use currency::{
    add_currency, balance_breakdown, balance_in, format_breakdown, format_coins, parse_currency,
    total_copper,
};
pub use errors::LedgerError;
pub use resolver::{
    normalize_item_name, resolve_item, Resolution, ResolvedItem, DEFAULT_LV_THRESHOLD,
    MAX_ITEM_NAME_CHARS,
};
pub use types::*;
