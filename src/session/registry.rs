//! Request-scoped session registry.

use std::collections::HashMap;

use crate::error::Error;
use crate::store::MemStore;

use super::Session;

/// Memoizes decoded sessions for the duration of one request.
///
/// Create one registry per request. The first lookup for a given store and
/// name decodes the cookie and fetches the cached values; repeated lookups
/// return the same live session object (and the same remembered decode
/// error) without touching the codec or the cache again.
#[derive(Default)]
pub struct Registry {
    sessions: HashMap<(u64, String), (Session, Option<Error>)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for `name` from `store`, decoding at most once per
    /// request. The error mirrors `MemStore::new_session`: a rejected cookie
    /// is reported while the returned session stays usable.
    pub fn get(
        &mut self,
        store: &MemStore,
        cookie_header: Option<&str>,
        name: &str,
    ) -> (&mut Session, Option<&Error>) {
        let key = (store.id(), name.to_string());
        let entry = self
            .sessions
            .entry(key)
            .or_insert_with(|| store.new_session(cookie_header, name));
        (&mut entry.0, entry.1.as_ref())
    }
}
