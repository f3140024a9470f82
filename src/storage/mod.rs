//! # Storage Module - JSON Persistence Layer
//!
//! The ledger lives in two flat JSON files inside the configured data
//! directory:
//!
//! ```text
//! data/
//! ├── Players.json   ← user id → player record
//! └── Items.json     ← item name → item record
//! ```
//!
//! ## Contract
//!
//! - **Load**: a missing or blank file is an empty mapping, not an error.
//!   Anything else must decode into the typed records or loading fails with
//!   [`LedgerError::Decode`] naming the file.
//! - **Persist**: the whole mapping is serialized (pretty printed) and
//!   replaces the file. Writes go to a temp file that is renamed over the
//!   destination while an exclusive `fs2` lock is held, so readers never
//!   observe a half-written store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tinkertales::storage::Storage;
//!
//! fn main() -> Result<(), tinkertales::ledger::LedgerError> {
//!     let storage = Storage::open("./data")?;
//!     let mut players = storage.load_players()?;
//!     players.get_or_create(1234, "Ada", "ada");
//!     storage.persist_players(&players)?;
//!     Ok(())
//! }
//! ```

use fs2::FileExt;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::ledger::{Catalog, LedgerError, Players};

pub const PLAYERS_FILE: &str = "Players.json";
pub const ITEMS_FILE: &str = "Items.json";

/// File-backed store for the player ledger and item catalog.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open (and create if needed) the data directory.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, LedgerError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Storage { data_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(PLAYERS_FILE)
    }

    pub fn items_path(&self) -> PathBuf {
        self.data_dir.join(ITEMS_FILE)
    }

    pub fn load_players(&self) -> Result<Players, LedgerError> {
        load_store(&self.players_path())
    }

    pub fn load_catalog(&self) -> Result<Catalog, LedgerError> {
        load_store(&self.items_path())
    }

    pub fn persist_players(&self, players: &Players) -> Result<(), LedgerError> {
        persist_store(&self.players_path(), players)
    }

    pub fn persist_catalog(&self, catalog: &Catalog) -> Result<(), LedgerError> {
        persist_store(&self.items_path(), catalog)
    }
}

fn store_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("store")
        .to_string()
}

/// Read a whole mapping; missing or blank files decode to `T::default()`.
pub fn load_store<T>(path: &Path) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
{
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };

    // Guard against any accidental leading NULs
    let cleaned = data.trim_start_matches('\0');
    if cleaned.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(cleaned).map_err(|source| LedgerError::Decode {
        store: store_name(path),
        source,
    })
}

/// Serialize the full mapping and atomically replace the file.
pub fn persist_store<T: Serialize>(path: &Path, value: &T) -> Result<(), LedgerError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| LedgerError::Encode {
        store: store_name(path),
        source,
    })?;
    write_file_locked(path, &content)?;
    debug!("persisted {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Write `content` to `path` under an exclusive lock via temp file + rename.
fn write_file_locked(path: &Path, content: &str) -> std::io::Result<()> {
    // Open (or create) the destination file to hold the lock while replacing it
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    lock_file.lock_exclusive()?;

    replace_via_temp(path, content)?;

    // Unlock by dropping the lock file
    drop(lock_file);
    Ok(())
}

/// Write a sibling temp file and rename it over `path`. The temp file is
/// removed again when writing or renaming fails.
fn replace_via_temp(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("store.json");

    let mut counter = 0u32;
    let (tmp_path, mut tmp) = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(tmp) => break (candidate, tmp),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };

    let written = (|| {
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        let _ = tmp.sync_all();
        drop(tmp);
        fs::rename(&tmp_path, path)
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // Fsync the directory to persist the rename (best-effort)
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    Ok(())
}
