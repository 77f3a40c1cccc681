use std::fmt::Display;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

/// The three independently persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    LikedTitles,
    MyListTitles,
    ContinueWatching,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [
        StoreKey::LikedTitles,
        StoreKey::MyListTitles,
        StoreKey::ContinueWatching,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::LikedTitles => "liked-titles",
            StoreKey::MyListTitles => "my-list-titles",
            StoreKey::ContinueWatching => "continue-watching",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable key-value storage holding raw JSON strings
///
/// Writes overwrite the whole value for a key; there are no partial updates.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    /// Returns `None` when the key has never been written
    fn read(&self, key: &str) -> AppResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Typed JSON access to a [`PreferenceStore`], scoped to an optional namespace
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn PreferenceStore>,
    namespace: Option<String>,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            namespace: None,
        }
    }

    /// Scopes every key under `namespace` (typically a profile id)
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = if namespace.trim().is_empty() {
            None
        } else {
            Some(namespace)
        };
        self
    }

    /// The physical key written to the backend
    pub fn key(&self, key: StoreKey) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, key),
            None => key.to_string(),
        }
    }

    /// Loads and deserializes a snapshot
    ///
    /// Never fails: a missing key, a backend error, or malformed JSON all
    /// yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let physical = self.key(key);
        let raw = match self.store.read(&physical) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %physical,
                    backend = self.store.name(),
                    "Store read failed, starting empty"
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key = %physical, "Discarding malformed snapshot");
                None
            }
        }
    }

    /// Loads a list snapshot, dropping elements that do not parse
    ///
    /// One damaged entry costs only that entry, not the whole collection.
    pub fn load_list<T: DeserializeOwned>(&self, key: StoreKey) -> Vec<T> {
        let raw: Vec<serde_json::Value> = self.load(key).unwrap_or_default();
        let total = raw.len();
        let items: Vec<T> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if items.len() < total {
            tracing::warn!(
                key = %self.key(key),
                dropped = total - items.len(),
                "Dropped unreadable snapshot entries"
            );
        }
        items
    }

    /// Serializes the full snapshot and overwrites the stored value
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> AppResult<()> {
        let physical = self.key(key);
        let json = serde_json::to_string(value)?;
        self.store.write(&physical, &json)?;
        tracing::debug!(key = %physical, bytes = json.len(), "Snapshot saved");
        Ok(())
    }

    /// Deletes the stored snapshot; a later load sees an empty collection
    pub fn remove(&self, key: StoreKey) -> AppResult<()> {
        let physical = self.key(key);
        self.store.remove(&physical)?;
        tracing::debug!(key = %physical, "Snapshot removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_store_key_display() {
        assert_eq!(format!("{}", StoreKey::LikedTitles), "liked-titles");
        assert_eq!(format!("{}", StoreKey::MyListTitles), "my-list-titles");
        assert_eq!(format!("{}", StoreKey::ContinueWatching), "continue-watching");
    }

    #[test]
    fn test_namespaced_key() {
        let adapter = StoreAdapter::new(Arc::new(MockPreferenceStore::new())).with_namespace("kids");
        assert_eq!(adapter.key(StoreKey::LikedTitles), "kids:liked-titles");
    }

    #[test]
    fn test_blank_namespace_is_ignored() {
        let adapter = StoreAdapter::new(Arc::new(MockPreferenceStore::new())).with_namespace("  ");
        assert_eq!(adapter.key(StoreKey::ContinueWatching), "continue-watching");
    }

    #[test]
    fn test_load_missing_key_returns_none() {
        let mut store = MockPreferenceStore::new();
        store.expect_read().returning(|_| Ok(None));
        let adapter = StoreAdapter::new(Arc::new(store));

        let loaded: Option<Vec<u64>> = adapter.load(StoreKey::LikedTitles);
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_load_malformed_json_returns_none() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_read()
            .returning(|_| Ok(Some("[{not json".to_string())));
        let adapter = StoreAdapter::new(Arc::new(store));

        let loaded: Option<Vec<u64>> = adapter.load(StoreKey::LikedTitles);
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_load_backend_error_returns_none() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_read()
            .returning(|_| Err(AppError::Storage("storage disabled".to_string())));
        store.expect_name().return_const("mock");
        let adapter = StoreAdapter::new(Arc::new(store));

        let loaded: Option<Vec<u64>> = adapter.load(StoreKey::MyListTitles);
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_load_list_drops_only_unreadable_entries() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_read()
            .returning(|_| Ok(Some(r#"[1, "two", 3, -4]"#.to_string())));
        let adapter = StoreAdapter::new(Arc::new(store));

        let loaded: Vec<i64> = adapter.load_list(StoreKey::LikedTitles);
        assert_eq!(loaded, vec![1, 3, -4]);
    }

    #[test]
    fn test_load_list_non_array_is_empty() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_read()
            .returning(|_| Ok(Some(r#"{"not": "an array"}"#.to_string())));
        let adapter = StoreAdapter::new(Arc::new(store));

        let loaded: Vec<i64> = adapter.load_list(StoreKey::ContinueWatching);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_remove_deletes_physical_key() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_remove()
            .withf(|key| key.to_string() == "kids:continue-watching")
            .times(1)
            .returning(|_| Ok(()));
        let adapter = StoreAdapter::new(Arc::new(store)).with_namespace("kids");

        adapter.remove(StoreKey::ContinueWatching).unwrap();
    }

    #[test]
    fn test_save_writes_full_snapshot_under_physical_key() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_write()
            .withf(|key, value| key.to_string() == "p1:my-list-titles" && value.to_string() == "[1,2,3]")
            .times(1)
            .returning(|_, _| Ok(()));
        let adapter = StoreAdapter::new(Arc::new(store)).with_namespace("p1");

        adapter.save(StoreKey::MyListTitles, &vec![1u64, 2, 3]).unwrap();
    }

    #[test]
    fn test_save_propagates_write_failure() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(AppError::Storage("quota exceeded".to_string())));
        let adapter = StoreAdapter::new(Arc::new(store));

        let result = adapter.save(StoreKey::LikedTitles, &Vec::<u64>::new());
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
