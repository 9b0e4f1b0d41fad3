//! Bounded, de-duplicated history of successful searches.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

/// Maximum number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Place names of past successful searches, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Builds a list from already-ordered entries, dropping blank names,
    /// duplicates and anything past the limit.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for entry in entries {
            let entry = entry.into();
            if !entry.trim().is_empty() && !out.contains(&entry) {
                out.push(entry);
            }
            if out.len() == MAX_RECENT_SEARCHES {
                break;
            }
        }
        Self(out)
    }

    /// Returns the list with `name` moved (or added) to the front.
    pub fn recorded(&self, name: &str) -> Self {
        let rest = self.0.iter().filter(|existing| existing.as_str() != name).cloned();
        let mut out = Vec::with_capacity(MAX_RECENT_SEARCHES);
        out.push(name.to_string());
        out.extend(rest);
        out.truncate(MAX_RECENT_SEARCHES);
        Self(out)
    }

    pub fn latest(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Persistence medium for recent searches.
///
/// `record` must have persisted the returned list before it returns.
pub trait RecentSearchStore: Send + Sync + Debug {
    /// Reads the persisted list. Missing or unreadable state yields an empty list.
    fn load(&self) -> RecentSearches;

    fn record(&self, name: &str, current: &RecentSearches) -> Result<RecentSearches>;
}

/// Stores the list as a JSON array of strings in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentSearchStore for JsonFileStore {
    fn load(&self) -> RecentSearches {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no recent searches stored yet");
                return RecentSearches::default();
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to read recent searches"
                );
                return RecentSearches::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&contents) {
            Ok(entries) => RecentSearches::from_entries(entries),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring malformed recent searches"
                );
                RecentSearches::default()
            }
        }
    }

    fn record(&self, name: &str, current: &RecentSearches) -> Result<RecentSearches> {
        let updated = current.recorded(name);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string(&updated).context("Failed to serialize recent searches")?;

        fs::write(&self.path, json).with_context(|| {
            format!("Failed to write recent searches: {}", self.path.display())
        })?;

        Ok(updated)
    }
}

/// Keeps the list in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    persisted: Mutex<RecentSearches>,
}

impl MemoryStore {
    pub fn new(initial: RecentSearches) -> Self {
        Self { persisted: Mutex::new(initial) }
    }

    pub fn snapshot(&self) -> RecentSearches {
        self.persisted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl RecentSearchStore for MemoryStore {
    fn load(&self) -> RecentSearches {
        self.snapshot()
    }

    fn record(&self, name: &str, current: &RecentSearches) -> Result<RecentSearches> {
        let updated = current.recorded(name);
        *self.persisted.lock().unwrap_or_else(PoisonError::into_inner) = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn recording_six_names_keeps_newest_five() {
        let mut recent = RecentSearches::default();
        for name in ["Oslo", "Rome", "Lima", "Kyiv", "Doha", "Baku"] {
            recent = recent.recorded(name);
        }

        assert_eq!(recent.as_slice(), ["Baku", "Doha", "Kyiv", "Lima", "Rome"]);
    }

    #[test]
    fn re_recording_moves_to_front_without_duplicate() {
        let recent = RecentSearches::default()
            .recorded("Paris")
            .recorded("Berlin")
            .recorded("Paris");

        assert_eq!(recent.as_slice(), ["Paris", "Berlin"]);
        assert_eq!(recent.latest(), Some("Paris"));
    }

    #[test]
    fn de_duplication_is_case_sensitive() {
        let recent = RecentSearches::default().recorded("paris").recorded("Paris");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn from_entries_normalizes_persisted_lists() {
        let recent = RecentSearches::from_entries(["a", "b", "a", "c", "d", "e", "f", "g"]);
        assert_eq!(recent.as_slice(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn from_entries_skips_blank_names() {
        let recent = RecentSearches::from_entries(["", "  ", "Oslo", "\t", "Rome"]);
        assert_eq!(recent.as_slice(), ["Oslo", "Rome"]);
        assert_eq!(recent.latest(), Some("Oslo"));
    }

    #[test]
    fn file_store_blank_only_history_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, r#"["", "   "]"#).unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn file_store_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("recent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn file_store_malformed_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recent.json");

        for garbage in ["{not json", "{\"a\": 1}", "[1, 2, 3]", "null"] {
            fs::write(&path, garbage).unwrap();
            assert!(JsonFileStore::new(&path).load().is_empty(), "input: {garbage}");
        }
    }

    #[test]
    fn file_store_record_persists_before_returning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("recent.json");
        let store = JsonFileStore::new(&path);

        let recent = store.record("Tokyo", &RecentSearches::default()).unwrap();
        let recent = store.record("Paris", &recent).unwrap();

        let on_disk: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, ["Paris", "Tokyo"]);
        assert_eq!(store.load(), recent);
    }

    #[test]
    fn file_store_record_fails_when_path_is_a_directory() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let err = store.record("Paris", &RecentSearches::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to write recent searches"));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::default();
        let recent = store.record("Lima", &store.load()).unwrap();
        assert_eq!(store.snapshot(), recent);
        assert_eq!(store.load().as_slice(), ["Lima"]);
    }
}
