//! On-disk provider cache.
//!
//! The cache is a pretty-printed JSON array of [`Provider`] at a single path.
//! Its modification time is the only freshness signal: contents are never
//! hashed or versioned.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::error::CacheError;
use super::types::Provider;

/// Source of the current time, injectable so staleness can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Result of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    pub stale: bool,
    pub exists: bool,
}

/// Reads and writes the provider list at a fixed path.
#[derive(Clone)]
pub struct CacheStore {
    path: PathBuf,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Creates a store using the system clock.
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self::with_clock(path, max_age, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, max_age: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            max_age,
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether the cache file exists and is older than the max age.
    ///
    /// Any metadata error counts as "missing and stale". A modification time
    /// in the future counts as fresh.
    pub fn is_stale(&self) -> CacheStatus {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => {
                return CacheStatus {
                    stale: true,
                    exists: false,
                }
            }
        };
        let age = self
            .clock
            .now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        CacheStatus {
            stale: age > self.max_age,
            exists: true,
        }
    }

    /// Loads the cached provider list.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] if the file cannot be read and
    /// [`CacheError::Decode`] if it is not a valid provider array.
    pub fn load(&self) -> Result<Vec<Provider>, CacheError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| CacheError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CacheError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the cache file with `providers`.
    ///
    /// Writes to a temporary sibling first and renames it into place, so a
    /// concurrent reader sees either the old or the new file, never a
    /// truncated one.
    pub fn save(&self, providers: &[Provider]) -> Result<(), CacheError> {
        tracing::info!(path = %self.path.display(), "saving provider cache");
        let json = serde_json::to_string_pretty(providers).map_err(CacheError::Encode)?;
        write_atomic(&self.path, &json).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("providers.json");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let temp_path = dir.join(format!(".{file_name}.tmp-{}-{nanos}", std::process::id()));

    fs::write(&temp_path, contents)?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    Ok(())
}
