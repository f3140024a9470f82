use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::currency;

/// Chat platform user identifier (Telegram user ids are 64-bit integers).
pub type UserId = i64;

/// Placeholder description for items created on first mention.
pub const DEFAULT_ITEM_DESCRIPTION: &str = "No description has been added";

/// Price of one game session in `account_balance` units.
pub const DEFAULT_SESSION_PRICE: i64 = 30;

// ============================================================================
// Currency denominations
// ============================================================================

/// Coin denominations, ordered from the highest value to the lowest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    Platinum,
    Gold,
    Silver,
    Copper,
}

impl Denomination {
    /// All denominations, highest value first. Breakdown order depends on this.
    pub const ALL: [Denomination; 4] = [
        Denomination::Platinum,
        Denomination::Gold,
        Denomination::Silver,
        Denomination::Copper,
    ];

    /// Value of one coin expressed in copper pieces.
    pub fn value(self) -> u64 {
        match self {
            Denomination::Platinum => 1000,
            Denomination::Gold => 100,
            Denomination::Silver => 10,
            Denomination::Copper => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Denomination::Platinum => "platinum",
            Denomination::Gold => "gold",
            Denomination::Silver => "silver",
            Denomination::Copper => "copper",
        }
    }

    /// Single letter shorthand used in amounts like `5g 3s`.
    pub fn symbol(self) -> &'static str {
        match self {
            Denomination::Platinum => "p",
            Denomination::Gold => "g",
            Denomination::Silver => "s",
            Denomination::Copper => "c",
        }
    }

    /// Case-insensitive lookup by name, plural name or shorthand symbol.
    pub fn lookup(input: &str) -> Option<Self> {
        let search = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|d| {
            search == d.name()
                || search == d.symbol()
                || search.strip_suffix('s') == Some(d.name())
        })
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Player records
// ============================================================================

/// Per-user ledger record.
///
/// `account_balance` is the legacy prepaid balance used for session billing;
/// `copper_pieces` is the in-game purse. The two are never converted into
/// each other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: UserId,
    pub first_name: String,
    pub username: String,
    #[serde(default)]
    pub num_sessions: u32,
    #[serde(default)]
    pub account_balance: i64,
    #[serde(default)]
    pub inventory: BTreeMap<String, u64>,
    /// Net purse value in copper pieces, split into coins on display.
    #[serde(default)]
    pub copper_pieces: u64,
}

impl Player {
    pub fn new(id: UserId, first_name: &str, username: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            username: username.to_string(),
            num_sessions: 0,
            account_balance: 0,
            inventory: BTreeMap::new(),
            copper_pieces: 0,
        }
    }

    /// Number of whole sessions the account balance pays for (floor division).
    pub fn remaining_sessions(&self, session_price: i64) -> i64 {
        if session_price <= 0 {
            return 0;
        }
        self.account_balance.div_euclid(session_price)
    }

    pub fn item_qty(&self, item_name: &str) -> u64 {
        self.inventory.get(item_name).copied().unwrap_or(0)
    }

    pub fn set_item_qty(&mut self, item_name: &str, qty: u64) {
        self.inventory.insert(item_name.to_string(), qty);
    }

    pub fn currency_breakdown(&self) -> Vec<(Denomination, u64)> {
        currency::balance_breakdown(self.copper_pieces)
    }

    pub fn currency_in(&self, denomination: &str) -> u64 {
        currency::balance_in(self.copper_pieces, denomination)
    }

    /// Add coins to the purse; unknown denominations contribute nothing.
    pub fn add_currency<S: AsRef<str>>(&mut self, increments: &[(S, u64)]) -> u64 {
        self.copper_pieces = currency::add_currency(self.copper_pieces, increments);
        self.copper_pieces
    }
}

/// The player ledger: user id to [`Player`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Players {
    players: BTreeMap<UserId, Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the player for `id`, creating it from the identity fields when absent.
    ///
    /// The flag is true when a record was inserted. Identity fields on an
    /// existing record are left untouched.
    pub fn get_or_create(
        &mut self,
        id: UserId,
        first_name: &str,
        username: &str,
    ) -> (&mut Player, bool) {
        let mut created = false;
        let player = self.players.entry(id).or_insert_with(|| {
            created = true;
            Player::new(id, first_name, username)
        });
        (player, created)
    }

    pub fn get(&self, id: UserId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: UserId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}

// ============================================================================
// Item catalog
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    #[serde(default = "default_item_description")]
    pub description: String,
}

fn default_item_description() -> String {
    DEFAULT_ITEM_DESCRIPTION.to_string()
}

impl Item {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: default_item_description(),
        }
    }
}

/// The item catalog: canonical item name to [`Item`].
///
/// Keys iterate in sorted order, which is also the fuzzy tie-break order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    items: BTreeMap<String, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with known item names, skipping existing keys.
    pub fn seed<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for name in names {
            if self.insert_if_absent(name.as_ref()) {
                added += 1;
            }
        }
        added
    }

    /// Insert a fresh [`Item`] for `name` unless it is already a key.
    pub fn insert_if_absent(&mut self, name: &str) -> bool {
        if self.items.contains_key(name) {
            return false;
        }
        self.items.insert(name.to_string(), Item::new(name));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
