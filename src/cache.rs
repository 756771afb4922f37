//! TTL cache backends
//!
//! Entries live one per file under a cache directory. The file name is the
//! SHA-256 hex digest of the logical key, so keys never touch the filesystem
//! directly. Expiry is checked lazily on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::{Result, SkycastError};

const ENTRY_EXTENSION: &str = "json";

/// Outcome of a cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Vec<u8>),
    Miss,
    /// The entry existed but had expired; it has been removed
    Expired,
}

/// Operations every cache backend provides
pub trait TtlCache {
    fn get(&self, key: &str) -> CacheLookup;

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry
    fn clear(&self) -> Result<()>;

    /// Remove expired and unreadable entries, returning how many were removed
    fn clean_expired(&self) -> Result<usize>;

    /// True when the key holds a live entry. Expired entries are removed as a side effect.
    fn has(&self, key: &str) -> bool {
        matches!(self.get(key), CacheLookup::Hit(_))
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

/// File-backed cache
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            SkycastError::cache(format!(
                "failed to create cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir
            .join(format!("{}.{ENTRY_EXTENSION}", hex::encode(digest)))
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file()
                && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
            {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn remove_quietly(path: &Path) {
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!("Failed to remove cache file {}: {}", path.display(), e);
            }
            _ => {}
        }
    }
}

impl TtlCache for FileCache {
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    fn get(&self, key: &str) -> CacheLookup {
        let path = self.entry_path(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Key not found");
                return CacheLookup::Miss;
            }
            Err(e) => {
                warn!("Unreadable cache file {}: {}", path.display(), e);
                return CacheLookup::Miss;
            }
        };

        let entry: StoredEntry<Vec<u8>> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt cache entry {}, removing: {}", path.display(), e);
                Self::remove_quietly(&path);
                return CacheLookup::Miss;
            }
        };

        if Utc::now() > entry.expires_at {
            debug!("Key found but expired");
            Self::remove_quietly(&path);
            return CacheLookup::Expired;
        }

        debug!("Key found and still fresh");
        CacheLookup::Hit(entry.value)
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| SkycastError::cache("TTL overflow"))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| SkycastError::cache("TTL overflow"))?;

        let entry = StoredEntry { value, expires_at };
        let body = serde_json::to_vec(&entry)
            .map_err(|e| SkycastError::cache(format!("failed to encode cache entry: {e}")))?;

        // the directory may have been removed since construction
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(key), body)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn clear(&self) -> Result<()> {
        let files = self.entry_files()?;
        let count = files.len();
        for path in files {
            fs::remove_file(&path).map_err(|e| {
                SkycastError::cache(format!(
                    "failed to delete cache file {}: {e}",
                    path.display()
                ))
            })?;
        }
        info!("Cleared {} cache entries from {}", count, self.dir.display());
        Ok(())
    }

    fn clean_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for path in self.entry_files()? {
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            let stale = match serde_json::from_slice::<StoredEntry<serde::de::IgnoredAny>>(&bytes) {
                Ok(entry) => now > entry.expires_at,
                Err(_) => true,
            };
            if stale {
                Self::remove_quietly(&path);
                removed += 1;
            }
        }

        debug!("Removed {} stale cache entries", removed);
        Ok(removed)
    }
}

/// Cache that stores nothing; every read is a miss
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl TtlCache for NoOpCache {
    fn get(&self, _key: &str) -> CacheLookup {
        CacheLookup::Miss
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn clean_expired(&self) -> Result<usize> {
        Ok(0)
    }
}

/// Cache backend selected from configuration
#[derive(Debug, Clone)]
pub enum CacheBackend {
    File(FileCache),
    Disabled(NoOpCache),
}

impl CacheBackend {
    /// Build the backend the configuration asks for. A file cache that cannot
    /// be opened degrades to the disabled backend.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            debug!("Caching disabled by configuration");
            return Self::Disabled(NoOpCache);
        }

        let dir = config.directory_path();
        match FileCache::new(&dir) {
            Ok(cache) => {
                debug!("Using file cache at {}", dir.display());
                Self::File(cache)
            }
            Err(e) => {
                warn!("Failed to create cache, continuing without it: {}", e);
                Self::Disabled(NoOpCache)
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl TtlCache for CacheBackend {
    fn get(&self, key: &str) -> CacheLookup {
        match self {
            Self::File(cache) => cache.get(key),
            Self::Disabled(cache) => cache.get(key),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        match self {
            Self::File(cache) => cache.set(key, value, ttl),
            Self::Disabled(cache) => cache.set(key, value, ttl),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::File(cache) => cache.delete(key),
            Self::Disabled(cache) => cache.delete(key),
        }
    }

    fn clear(&self) -> Result<()> {
        match self {
            Self::File(cache) => cache.clear(),
            Self::Disabled(cache) => cache.clear(),
        }
    }

    fn clean_expired(&self) -> Result<usize> {
        match self {
            Self::File(cache) => cache.clean_expired(),
            Self::Disabled(cache) => cache.clean_expired(),
        }
    }
}
