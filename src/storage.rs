use std::collections::HashMap;
use std::sync::Mutex;

/// Cache entry holding the serialized cart snapshot.
pub const CART_CACHE_KEY: &str = "cart";
/// Cache entry holding the serialized auth session.
pub const SESSION_CACHE_KEY: &str = "user";

/// Key-value persistence seam. The browser shell backs this with
/// localStorage; tests use [`MemoryStore`]. Storage is a single shared slot
/// per key with last-writer-wins semantics — no cross-tab locking exists.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process store used in tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .map(|entries| entries.get(key).cloned())
            .unwrap_or(None)
    }

    fn put(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}
