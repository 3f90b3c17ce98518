//! Mutex-guarded in-memory cache of session value bundles.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::values::Values;

/// Process-local map from session name to its stored value bundle.
///
/// Each store owns exactly one cache; its lifetime is the store's lifetime.
/// Entries are never evicted by time and memory is unbounded. Every
/// operation holds the exclusive lock for the duration of the call, so
/// individual operations are linearizable, but sequences of calls are not
/// atomic with respect to other callers.
#[derive(Default)]
pub(crate) struct Cache {
    data: Mutex<HashMap<String, Values>>,
}

impl Cache {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a clone of the stored bundle, or `None` if the name is absent.
    pub fn value(&self, name: &str) -> Option<Values> {
        self.data.lock().get(name).cloned()
    }

    /// Inserts or overwrites the bundle for `name`. Last writer wins.
    pub fn set_value(&self, name: &str, values: Values) {
        self.data.lock().insert(name.to_string(), values);
    }

    /// Removes the entry for `name` if present; silently does nothing otherwise.
    pub fn delete(&self, name: &str) {
        self.data.lock().remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn bundle(key: &str, value: &str) -> Values {
        let mut values = Values::new();
        values.insert(key.to_string(), json!(value));
        values
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let cache = Cache::new();
        cache.set_value("key1", bundle("subkey1", "value1"));

        let got = cache.value("key1").unwrap();
        assert_eq!(got, bundle("subkey1", "value1"));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = Cache::new();
        assert!(cache.value("thereisnokey").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let cache = Cache::new();
        cache.set_value("key1", bundle("subkey1", "value1"));
        cache.set_value("key1", bundle("subkey1", "value2"));

        let got = cache.value("key1").unwrap();
        assert_eq!(got["subkey1"], json!("value2"));
    }

    #[test]
    fn test_delete_removes_entry() {
        let cache = Cache::new();
        cache.set_value("key1", bundle("subkey1", "value1"));
        assert!(cache.value("key1").is_some());

        cache.delete("key1");
        assert!(cache.value("key1").is_none());
    }

    #[test]
    fn test_delete_absent_key_is_a_noop() {
        let cache = Cache::new();
        cache.delete("thereisnokey");
        assert!(cache.value("thereisnokey").is_none());
    }

    #[test]
    fn test_concurrent_access_does_not_corrupt() {
        let cache = Arc::new(Cache::new());
        let names = ["alpha", "beta", "gamma"];

        let mut handles = Vec::new();
        for t in 0..8usize {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500usize {
                    let name = names[(t + i) % names.len()];
                    cache.set_value(name, bundle("n", &i.to_string()));
                    let _ = cache.value(name);
                    if i % 7 == 0 {
                        cache.delete(name);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // The map must still be consistent and usable afterwards.
        cache.set_value("alpha", bundle("n", "done"));
        assert_eq!(cache.value("alpha").unwrap()["n"], json!("done"));
    }
}
