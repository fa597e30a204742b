//! Recent search terms, persisted through an injected store.

use std::{
    collections::BTreeMap,
    future::Future,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use thiserror::Error;

pub const HISTORY_CAPACITY: usize = 10;
pub const HISTORY_KEY: &str = "searchHistory";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("history storage format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history storage lock poisoned")]
    Poisoned,
}

pub trait HistoryStore {
    fn load(&self) -> impl Future<Output = Result<Vec<String>, HistoryError>> + Send;
    fn save(&self, entries: &[String]) -> impl Future<Output = Result<(), HistoryError>> + Send;
    fn clear(&self) -> impl Future<Output = Result<(), HistoryError>> + Send;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryHistoryStore {
    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

impl MemoryHistoryStore {
    pub fn snapshot(&self) -> Result<Vec<String>, HistoryError> {
        let entries = self.entries.lock().map_err(|_| HistoryError::Poisoned)?;
        Ok(entries.clone())
    }

    fn replace(&self, entries: &[String]) -> Result<(), HistoryError> {
        let mut stored = self.entries.lock().map_err(|_| HistoryError::Poisoned)?;
        *stored = entries.to_vec();
        Ok(())
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Vec<String>, HistoryError> {
        self.snapshot()
    }

    async fn save(&self, entries: &[String]) -> Result<(), HistoryError> {
        self.replace(entries)
    }

    async fn clear(&self) -> Result<(), HistoryError> {
        self.replace(&[])
    }
}

/// JSON key/value file, one key per stored list. Other keys in the file are left alone.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>, HistoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(
        &self,
        values: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), HistoryError> {
        let raw = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<String>, HistoryError> {
        let values = self.read_all().await?;
        match values.get(HISTORY_KEY) {
            Some(list) => Ok(serde_json::from_value(list.clone())?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[String]) -> Result<(), HistoryError> {
        let mut values = self.read_all().await?;
        values.insert(HISTORY_KEY.to_string(), serde_json::to_value(entries)?);
        self.write_all(&values).await
    }

    async fn clear(&self) -> Result<(), HistoryError> {
        let mut values = self.read_all().await?;
        if values.remove(HISTORY_KEY).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

/// Bounded, de-duplicated list of past search terms, most recent first.
#[derive(Debug)]
pub struct SearchHistory<S> {
    entries: Vec<String>,
    store: S,
}

impl<S: HistoryStore> SearchHistory<S> {
    /// Loads the persisted entries. An unreadable store starts an empty history.
    pub async fn load(store: S) -> Self {
        let mut entries = match store.load().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "search history unreadable, starting empty");
                Vec::new()
            }
        };
        entries.retain(|e| !e.trim().is_empty());
        entries.truncate(HISTORY_CAPACITY);
        Self { entries, store }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Moves `term` to the front and persists the list. Blank terms are ignored.
    pub async fn record(&mut self, term: &str) -> Result<(), HistoryError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }
        self.entries.retain(|e| e != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        self.store.save(&self.entries).await
    }

    pub async fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.store.clear().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeated_term_moves_to_front_once() {
        let store = MemoryHistoryStore::default();
        let mut history = SearchHistory::load(store.clone()).await;
        history.record("sofa").await.unwrap();
        history.record("mesa").await.unwrap();
        history.record("mesa").await.unwrap();
        assert_eq!(history.entries(), ["mesa", "sofa"]);

        history.record("sofa").await.unwrap();
        assert_eq!(history.entries(), ["sofa", "mesa"]);
        assert_eq!(store.load().await.unwrap(), vec!["sofa", "mesa"]);
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let mut history = SearchHistory::load(MemoryHistoryStore::default()).await;
        for i in 0..25 {
            history.record(&format!("term {i}")).await.unwrap();
        }
        assert_eq!(history.entries().len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "term 24");
        assert_eq!(history.entries()[9], "term 15");
    }

    #[tokio::test]
    async fn blank_terms_are_ignored() {
        let mut history = SearchHistory::load(MemoryHistoryStore::default()).await;
        history.record("   ").await.unwrap();
        history.record("  lampara ").await.unwrap();
        assert_eq!(history.entries(), ["lampara"]);
    }

    #[tokio::test]
    async fn clear_empties_memory_and_store() {
        let store = MemoryHistoryStore::with_entries(vec!["a".into(), "b".into()]);
        let mut history = SearchHistory::load(store.clone()).await;
        assert_eq!(history.entries().len(), 2);
        history.clear().await.unwrap();
        assert!(history.entries().is_empty());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_round_trips_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, r#"{"theme":"dark"}"#).await.unwrap();

        let store = FileHistoryStore::new(&path);
        let mut history = SearchHistory::load(store.clone()).await;
        assert!(history.entries().is_empty());
        history.record("silla").await.unwrap();
        history.record("mesa").await.unwrap();

        let reloaded = SearchHistory::load(FileHistoryStore::new(&path)).await;
        assert_eq!(reloaded.entries(), ["mesa", "silla"]);

        history.clear().await.unwrap();
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(HISTORY_KEY));
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        let history = SearchHistory::load(FileHistoryStore::new(&path)).await;
        assert!(history.entries().is_empty());
    }

    #[tokio::test]
    async fn file_store_records_from_spawned_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut history = SearchHistory::load(FileHistoryStore::new(&path)).await;

        let history = tokio::spawn(async move {
            history.record("sillon").await.unwrap();
            history
        })
        .await
        .unwrap();

        assert_eq!(history.entries(), ["sillon"]);
        let stored = FileHistoryStore::new(&path).load().await.unwrap();
        assert_eq!(stored, vec!["sillon"]);
    }
}
