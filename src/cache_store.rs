//! # Catalog cache store
//!
//! Persistence of the last resolved catalog snapshot, so that reloading the orrery within the
//! hour does not hit the rate-limited remote service again.
//!
//! A stored snapshot is one JSON document holding the two logical keys
//! ([`CACHE_PAYLOAD_KEY`](crate::constants::CACHE_PAYLOAD_KEY) and
//! [`CACHE_TIME_KEY`](crate::constants::CACHE_TIME_KEY)), so payload and timestamp are
//! always written together.
//!
//! Stores do **not** enforce expiry: the TTL check lives in
//! [`CatalogClient`](crate::catalog::client::CatalogClient) through
//! [`CacheEntry::is_valid_at`].
//!
//! ## Implementations
//!
//! - [`FileCacheStore`]: JSON file under the user cache directory, replaced atomically
//!   through a temporary sibling file.
//! - [`MemoryCacheStore`]: process-local store.
use std::fs;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::records::BodyRecord;
use crate::constants::{Millis, CACHE_DIR_NAME, CACHE_FILE_NAME, CACHE_TTL_MS};
use crate::orrery_errors::OrreryError;

/// A catalog snapshot and the wall-clock time it was fetched at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "neoData")]
    pub payload: Vec<BodyRecord>,
    #[serde(rename = "neoDataTime")]
    pub fetched_at: Millis,
}

impl CacheEntry {
    pub fn new(payload: Vec<BodyRecord>, fetched_at: Millis) -> Self {
        CacheEntry {
            payload,
            fetched_at,
        }
    }

    /// `true` while `now - fetched_at < CACHE_TTL_MS`.
    ///
    /// An entry stamped in the future counts as just fetched.
    pub fn is_valid_at(&self, now: Millis) -> bool {
        now.saturating_sub(self.fetched_at) < CACHE_TTL_MS
    }

    fn decode(raw: &str) -> Result<Self, OrreryError> {
        serde_json::from_str(raw).map_err(|err| OrreryError::CacheReadFailure(err.to_string()))
    }

    fn encode(&self) -> Result<String, OrreryError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Key/value persistence of one [`CacheEntry`].
///
/// `read` never fails: a missing or undecodable entry is reported as `None`.
pub trait CacheStore: Send + Sync {
    fn read(&self) -> Option<CacheEntry>;

    fn write(&self, entry: &CacheEntry) -> Result<(), OrreryError>;

    fn clear(&self) -> Result<(), OrreryError>;
}

impl<S: CacheStore + ?Sized> CacheStore for &S {
    fn read(&self) -> Option<CacheEntry> {
        (**self).read()
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), OrreryError> {
        (**self).write(entry)
    }

    fn clear(&self) -> Result<(), OrreryError> {
        (**self).clear()
    }
}

fn decode_or_miss(raw: &str) -> Option<CacheEntry> {
    match CacheEntry::decode(raw) {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(error = %err, "Ignoring unreadable catalog cache");
            None
        }
    }
}

/// Snapshot persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: Utf8PathBuf,
}

impl FileCacheStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        FileCacheStore { path: path.into() }
    }

    /// Store located at `<user cache dir>/neo_orrery_cache/neo_data.json`.
    ///
    /// Return
    /// ------
    /// * The store, or an error if no home/cache directory can be determined or it is not UTF-8
    pub fn in_user_cache_dir() -> Result<Self, OrreryError> {
        let base_dir = BaseDirs::new().ok_or_else(|| {
            OrreryError::UnableToCreateBaseDir("no home directory for this user".into())
        })?;
        let cache_dir = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
            OrreryError::Utf8PathError(format!("{}", base_dir.cache_dir().display()))
        })?;

        Ok(FileCacheStore::new(
            cache_dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn temp_path(&self) -> Utf8PathBuf {
        let mut name = self
            .path
            .file_name()
            .unwrap_or(CACHE_FILE_NAME)
            .to_string();
        name.push_str(".tmp");
        self.path.with_file_name(name)
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self) -> Option<CacheEntry> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_or_miss(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path, error = %err, "Unable to read catalog cache");
                None
            }
        }
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), OrreryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = entry.encode()?;
        let tmp = self.temp_path();
        fs::write(&tmp, raw)?;
        // rename replaces the old snapshot in one step, readers never see half a document
        if let Err(err) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!(path = %tmp, error = %cleanup, "Unable to remove temporary catalog cache");
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), OrreryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local snapshot, kept in its serialized form.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    raw: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `entry`.
    pub fn with_entry(entry: &CacheEntry) -> Result<Self, OrreryError> {
        Ok(Self::with_raw(entry.encode()?))
    }

    /// Store pre-filled with arbitrary text, e.g. a document written by an older version.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryCacheStore {
            raw: Mutex::new(Some(raw.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `write` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self) -> Option<CacheEntry> {
        let guard = self.raw.lock().ok()?;
        decode_or_miss(guard.as_deref()?)
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), OrreryError> {
        let raw = entry.encode()?;
        let mut guard = self
            .raw
            .lock()
            .map_err(|err| OrreryError::CacheWriteFailure(err.to_string()))?;
        *guard = Some(raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), OrreryError> {
        if let Ok(mut guard) = self.raw.lock() {
            *guard = None;
        }
        Ok(())
    }
}
