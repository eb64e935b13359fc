//! Key-value persistence
//!
//! Scores and settings are small JSON strings under versioned keys. On the
//! web they live in LocalStorage; natively (and in tests) in memory.
//!
//! Every failure is soft: callers log a warning and fall back to defaults.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// String key-value store
pub trait KeyValueStore {
    /// Read a key (`Ok(None)` if absent)
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write a key, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Open the window's LocalStorage (unavailable in some private modes)
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}

/// The platform's default store
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}, falling back to memory", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load a JSON value, falling back to `T::default()` on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Discarding stored {}: {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "k", &Sample { value: 7 }).unwrap();
        let loaded: Option<Sample> = load_json(&store, "k").unwrap();
        assert_eq!(loaded, Some(Sample { value: 7 }));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Sample> = load_json(&store, "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_is_error() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let result: Result<Option<Sample>, _> = load_json(&store, "k");
        assert!(matches!(result, Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_malformed_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set("k", "[1, 2").unwrap();
        let loaded: Sample = load_or_default(&store, "k");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
