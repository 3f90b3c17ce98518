//! Per-request session objects.

use serde::{de::DeserializeOwned, Serialize};

use crate::cookie::CookieOptions;
use crate::error::Error;
use crate::values::Values;

/// A session as seen by one request.
///
/// Sessions are created fresh by the store for every fetch and consumed by
/// `save`; they are never shared across requests or threads. The value
/// bundle is a private deep copy of whatever the store has cached, so
/// mutating it affects nothing until the session is saved.
#[derive(Debug)]
pub struct Session {
    name: String,

    /// Opaque identifier authenticated by the cookie codec.
    pub id: String,

    /// The session's key/value payload, freely mutable by the handler.
    pub values: Values,

    /// Cookie attributes for this session; starts as a copy of the store
    /// defaults, so per-session changes never leak back into the store.
    pub options: CookieOptions,

    pub(crate) is_new: bool,
}

impl Session {
    pub(crate) fn new(name: &str, options: CookieOptions) -> Self {
        Self {
            name: name.to_string(),
            id: random_id(),
            values: Values::new(),
            options,
            is_new: true,
        }
    }

    /// The session name, which is also the cookie name and the cache key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this session was created fresh rather than restored from the cache.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Read a value, deserialized into `T`. Returns `None` when the key is
    /// absent or holds a value of an incompatible shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Store a value under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: &str, value: impl Serialize) -> Result<(), Error> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Remove and return the raw value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }
}

/// Generate a fresh opaque session identifier (16 random bytes, hex-encoded).
pub(crate) fn random_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
