use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

pub const PREF_ENDPOINT: &str = "pref_endpoint";
pub const PREF_AUTH_TOKEN: &str = "pref_auth_token";
pub const PREF_HISTORY: &str = "pref_history";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("decode: {0}")] Decode(String),
    #[error("storage unavailable: {0}")] Unavailable(String),
}

/// Flat string key/value storage shared by settings and history.
///
/// A missing key is never an error: callers that need a value use
/// [`PreferenceStore::get_or_empty`].
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn get_or_empty(&self, key: &str) -> Result<String, StoreError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    // Implementations backed by a single file override this to write once.
    fn put_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (k, v) in entries {
            self.put(k, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(map),
        }
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.values.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
