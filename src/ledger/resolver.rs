//! Item Name Resolution
//!
//! Resolves the free-text item names players type into canonical catalog
//! entries, so `/set_item_qty 2 healng potion` lands on "Healing Potion".
//!
//! ## Resolution order
//! 1. **Empty catalog**: the query becomes the first entry.
//! 2. **Exact key**: returned as-is.
//! 3. **Fuzzy alias**: the best [`weighted_ratio`] candidate wins when it
//!    scores at least the threshold. Equal scores keep the first key in
//!    catalog order.
//! 4. **New item**: anything else is added under the typed name.
//!
//! Resolution never fails, but it may insert into the catalog, so callers
//! must persist the catalog after every call that reports [`Resolution::Created`].
//!
//! [`weighted_ratio`]: crate::ledger::fuzzy::weighted_ratio

use log::{debug, info};

use super::fuzzy;
use super::types::{Catalog, Item};
use crate::logutil::escape_log;

/// Default fuzzy acceptance threshold (0-100).
pub const DEFAULT_LV_THRESHOLD: u8 = 80;

/// Longest item name accepted from chat. Partial scoring grows with the
/// square of the name length, so callers reject longer names before
/// [`resolve_item`] sees them.
pub const MAX_ITEM_NAME_CHARS: usize = 100;

/// How a query was mapped onto the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The query was already a catalog key.
    Exact,
    /// The query was close enough to an existing key.
    Alias { score: u8 },
    /// No close key; a new entry was inserted.
    Created,
}

/// Outcome of [`resolve_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub item: Item,
    pub resolution: Resolution,
}

impl ResolvedItem {
    /// True when the catalog changed and needs persisting.
    pub fn created(&self) -> bool {
        self.resolution == Resolution::Created
    }
}

/// Collapse runs of whitespace and trim, keeping the original case.
pub fn normalize_item_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map `query` onto a catalog entry, inserting a new one when nothing is close.
pub fn resolve_item(catalog: &mut Catalog, query: &str, threshold: u8) -> ResolvedItem {
    if catalog.is_empty() {
        info!(
            "catalog is empty, creating entry for '{}'",
            escape_log(query)
        );
        return create(catalog, query);
    }

    if let Some(item) = catalog.get(query) {
        return ResolvedItem {
            item: item.clone(),
            resolution: Resolution::Exact,
        };
    }

    let best = fuzzy::best_match(query, catalog.names())
        .map(|(name, score)| (name.to_string(), score));
    match best {
        Some((name, score)) if score >= threshold => {
            info!(
                "'{}' resolved to similar item '{}' (score {})",
                escape_log(query),
                name,
                score
            );
            match catalog.get(&name).cloned() {
                Some(item) => ResolvedItem {
                    item,
                    resolution: Resolution::Alias { score },
                },
                None => create(catalog, &name),
            }
        }
        Some((name, score)) => {
            debug!(
                "closest item to '{}' was '{}' (score {})",
                escape_log(query),
                name,
                score
            );
            info!(
                "no item similar to '{}' in catalog, creating entry",
                escape_log(query)
            );
            create(catalog, query)
        }
        None => create(catalog, query),
    }
}

fn create(catalog: &mut Catalog, name: &str) -> ResolvedItem {
    catalog.insert_if_absent(name);
    let item = catalog.get(name).cloned().unwrap_or_else(|| Item::new(name));
    ResolvedItem {
        item,
        resolution: Resolution::Created,
    }
}
