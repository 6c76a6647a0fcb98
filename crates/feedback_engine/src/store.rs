use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use client_logging::{client_info, client_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{FeedbackEntry, StatsSnapshot};

/// Durable key for the cached feedback list.
pub const FEEDBACK_KEY: &str = "buzzguard_feedback_v1";
/// Durable key for the cached stats snapshot.
pub const STATS_KEY: &str = "buzzguard_stats";
/// Durable key for the theme preference.
pub const THEME_KEY: &str = "bg-theme";

/// The cache keeps at most this many entries, most-recent first.
pub const MAX_CACHED_ENTRIES: usize = 20;

#[derive(Debug, Error)]
enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Durable client-side key-value store backing the offline fallback and
/// the fast-paint caches. Every operation is guarded: reads never raise
/// and failed writes only log, so a broken store degrades to an
/// always-empty cache instead of surfacing errors.
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    dir: PathBuf,
}

impl FeedbackStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// First-use setup: make sure the feed key exists as an empty list so
    /// later reads cannot tell "never initialized" from "empty."
    pub fn initialize(&self) {
        if self.key_path(FEEDBACK_KEY).exists() {
            return;
        }
        self.write_feed(&[]);
    }

    pub fn read_feed(&self) -> Vec<FeedbackEntry> {
        self.read_key(FEEDBACK_KEY).unwrap_or_default()
    }

    /// Replaces the stored list wholesale, truncated to the cache bound.
    pub fn write_feed(&self, entries: &[FeedbackEntry]) {
        let bounded = &entries[..entries.len().min(MAX_CACHED_ENTRIES)];
        self.write_key(FEEDBACK_KEY, &bounded);
    }

    /// Head-inserts one entry and evicts past the bound. Read-then-write,
    /// not atomic across concurrent clients; last writer wins.
    pub fn append(&self, entry: FeedbackEntry) {
        let mut entries = self.read_feed();
        entries.insert(0, entry);
        entries.truncate(MAX_CACHED_ENTRIES);
        self.write_key(FEEDBACK_KEY, &entries);
    }

    pub fn read_stats(&self) -> Option<StatsSnapshot> {
        self.read_key(STATS_KEY)
    }

    pub fn write_stats(&self, stats: &StatsSnapshot) {
        self.write_key(STATS_KEY, stats);
    }

    pub fn theme(&self) -> Option<Theme> {
        self.read_key(THEME_KEY)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.write_key(THEME_KEY, &theme);
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                client_warn!("Failed to read store key {} from {:?}: {}", key, path, err);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                client_warn!("Corrupt store key {} at {:?}: {}", key, path, err);
                None
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_write_key(key, value) {
            client_warn!("Failed to write store key {}: {}", key, err);
        }
    }

    fn try_write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        ensure_store_dir(&self.dir)?;
        let content = serde_json::to_string(value)?;

        // Temp file then rename, so readers never observe a partial write.
        let target = self.key_path(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        client_info!("Wrote store key {} ({} bytes)", key, content.len());
        Ok(())
    }
}

fn ensure_store_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::StoreDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
    }
    Ok(())
}
