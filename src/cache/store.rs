//! Persistent cache store backed by a single JSON document on disk
//!
//! Provides a `CacheStore` that keeps API responses keyed by their versioned
//! request URL, together with a write timestamp, and applies sequential schema
//! migrations when the on-disk document was produced by an older release.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Schema version the current code writes; stores behind this are migrated at open
pub const SCHEMA_VERSION: u32 = 3;

/// File name of the store document inside the store directory
const STORE_FILE: &str = "api_cache.json";

/// Errors that can occur when reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read or write failed
    #[error("cache store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store document could not be serialized
    #[error("cache store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single cached API response
///
/// There is at most one entry per key; writing an existing key overwrites it
/// in place. Freshness is decided by the caller against `written_at`; the
/// store itself has no notion of expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The versioned request URL this payload was fetched from
    pub key: String,
    /// The response body, as parsed JSON
    pub payload: Value,
    /// When the payload was written to the store
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
            written_at: Utc::now(),
        }
    }
}

/// On-disk record for one entry; the key lives in the document's map
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    payload: Value,
    written_at: DateTime<Utc>,
}

/// The whole store document
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: u32,
    entries: HashMap<String, StoredEntry>,
}

impl StoreDocument {
    /// An empty document at the current schema version
    fn fresh() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// What a migration does to the entries it finds
#[derive(Debug, Clone, Copy)]
enum MigrationAction {
    /// Entries from the previous version remain valid
    Keep,
    /// The payload shape changed incompatibly; drop everything
    ClearEntries,
}

/// A single step in the store's schema history
struct Migration {
    version: u32,
    action: MigrationAction,
}

/// Ordered schema history. Each step runs at most once, when an opened store
/// is behind it; replaying the full list from any historical version ends in
/// the same state as a fresh store at `SCHEMA_VERSION`.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        action: MigrationAction::Keep,
    },
    // v2: corner annotations in comparison payloads changed shape
    Migration {
        version: 2,
        action: MigrationAction::ClearEntries,
    },
    // v3: lap times are now pre-formatted strings
    Migration {
        version: 3,
        action: MigrationAction::ClearEntries,
    },
];

/// Durable key/value store for cached API responses
///
/// The store is a single JSON document in the given directory. Reads load the
/// document from disk on every call and writes go straight back through, so a
/// `CacheStore` holds no in-memory state and clones are cheap.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory holding the store document
    dir: PathBuf,
}

impl CacheStore {
    /// Opens (or creates) the store in `dir`, applying any pending migrations
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        let store = Self { dir };
        store.migrate()?;
        Ok(store)
    }

    /// Returns the XDG-compliant default store directory
    ///
    /// Uses `~/.cache/pitwall/` on Linux, or the equivalent path on other
    /// platforms. Returns `None` if no home directory can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "pitwall")?;
        Some(project_dirs.cache_dir().to_path_buf())
    }

    /// Returns the path of the store document
    fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Reads the entry for `key`, if one exists
    ///
    /// Absence is `Ok(None)`; an I/O failure other than the document not
    /// existing yet propagates as an error.
    pub fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let mut document = self.load()?;
        Ok(document.entries.remove(key).map(|stored| CacheEntry {
            key: key.to_string(),
            payload: stored.payload,
            written_at: stored.written_at,
        }))
    }

    /// Writes an entry, replacing any previous entry with the same key
    pub fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let mut document = self.load()?;
        document.entries.insert(
            entry.key.clone(),
            StoredEntry {
                payload: entry.payload.clone(),
                written_at: entry.written_at,
            },
        );
        self.save(&document)
    }

    /// Number of entries currently stored
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.entries.len())
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.entries.is_empty())
    }

    /// Schema version recorded in the store document
    pub fn schema_version(&self) -> Result<u32, StoreError> {
        Ok(self.load()?.schema_version)
    }

    /// Applies pending migrations and writes the document back
    fn migrate(&self) -> Result<(), StoreError> {
        let mut document = if self.store_path().exists() {
            self.load()?
        } else {
            StoreDocument::fresh()
        };

        // A store written by a newer release gets the corruption treatment:
        // start over at the version this code understands.
        if document.schema_version > SCHEMA_VERSION {
            warn!(
                "cache store is at schema v{} but this build expects v{}; starting fresh",
                document.schema_version, SCHEMA_VERSION
            );
            document = StoreDocument::fresh();
        }

        let starting_version = document.schema_version;
        for migration in MIGRATIONS
            .iter()
            .filter(|m| m.version > starting_version)
        {
            if let MigrationAction::ClearEntries = migration.action {
                debug!(
                    "cache schema v{}: clearing {} cached entries",
                    migration.version,
                    document.entries.len()
                );
                document.entries.clear();
            }
            document.schema_version = migration.version;
        }

        self.save(&document)
    }

    /// Loads the store document from disk
    ///
    /// A missing document reads as an empty store. An unparseable document is
    /// also treated as empty so a damaged cache heals on the next write, while
    /// any other I/O failure propagates to the caller.
    fn load(&self) -> Result<StoreDocument, StoreError> {
        let content = match fs::read_to_string(self.store_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreDocument::fresh()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                warn!("cache store document is unreadable, treating as empty: {}", e);
                Ok(StoreDocument::fresh())
            }
        }
    }

    /// Writes the store document to disk, creating the directory if needed
    fn save(&self, document: &StoreDocument) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(document)?;
        fs::write(self.store_path(), json)?;
        Ok(())
    }
}
