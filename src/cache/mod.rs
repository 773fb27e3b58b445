//! Record cache
//!
//! Keeps parsed records keyed by source path together with a fingerprint of
//! the file (modification time and length). A record is served from the
//! cache only while the fingerprint still matches, so edits on disk are seen
//! on the next build without explicit invalidation.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

/// Identity of a file's contents as far as the cache is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    /// Modification time in nanoseconds since the unix epoch
    pub mtime: u128,
    pub len: u64,
}

impl Fingerprint {
    /// Fingerprint a file on disk
    pub async fn of(path: &Path) -> io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let mtime = metadata
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Ok(Self {
            mtime,
            len: metadata.len(),
        })
    }
}

/// A cached record
#[derive(Debug, Clone)]
struct CacheEntry<R> {
    fingerprint: Fingerprint,
    record: R,
}

/// Parsed records keyed by source path
#[derive(Debug)]
pub struct RecordCache<R> {
    entries: Mutex<HashMap<PathBuf, CacheEntry<R>>>,
}

impl<R: Clone> RecordCache<R> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry<R>>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get the record for `path` if it was cached with the same fingerprint
    pub fn get(&self, path: &Path, fingerprint: Fingerprint) -> Option<R> {
        self.entries()
            .get(path)
            .filter(|entry| entry.fingerprint == fingerprint)
            .map(|entry| entry.record.clone())
    }

    pub fn insert(&self, path: PathBuf, fingerprint: Fingerprint, record: R) {
        self.entries().insert(
            path,
            CacheEntry {
                fingerprint,
                record,
            },
        );
    }

    /// Forget a path, e.g. after it stopped parsing
    pub fn remove(&self, path: &Path) {
        self.entries().remove(path);
    }

    /// Drop entries for files that no longer exist
    pub fn retain_paths(&self, live: &[PathBuf]) {
        let live: HashSet<&PathBuf> = live.iter().collect();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|path, _| live.contains(path));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} stale cache entries", evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Clone> Default for RecordCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
