//! The in-memory session store.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::cache::Cache;
use crate::codec::{codecs_from_pairs, decode_multi, encode_multi, CodecError, KeyPair, SecureCookie};
use crate::cookie::{self, CookieOptions};
use crate::error::Error;
use crate::session::Session;
use crate::values::deep_copy;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(0);

/// In-memory session store.
///
/// Session values live in a process-local cache keyed by session name; the
/// client holds an authenticated cookie that references the entry without
/// carrying it. Intended for tests and development environments — nothing
/// survives a process restart, nothing is shared across processes, and
/// entries are never evicted.
///
/// The store is safe to share across request-handling threads. Note that
/// the fetch-then-save cycle carries no version check: two requests that
/// concurrently load, mutate and save the same session name end in a
/// last-write-wins outcome.
pub struct MemStore {
    codecs: Vec<SecureCookie>,
    options: CookieOptions,
    cache: Cache,
    id: u64,
}

impl MemStore {
    /// Create a store from one or more codec key pairs; the first pair
    /// signs new cookies, all pairs are tried when decoding (key rotation).
    /// Default cookie options are `path = "/"`.
    pub fn new(key_pairs: &[KeyPair]) -> Result<Self, CodecError> {
        Ok(Self {
            codecs: codecs_from_pairs(key_pairs)?,
            options: CookieOptions::default(),
            cache: Cache::new(),
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Replace the default cookie options copied into each new session.
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    /// Process-unique store identity, used as a registry key.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Create or fetch the session for `name`.
    ///
    /// Always returns a usable session. With no cookie (or no cookie for
    /// `name`) the session is new and empty. A cookie that fails
    /// authentication is reported through the second tuple element while
    /// the session stays new and empty, so the caller can log and treat the
    /// client as anonymous rather than failing the request. A valid cookie
    /// adopts the authenticated identifier; the session is then populated
    /// from the cache when an entry exists, and `is_new` reports whether it
    /// did not.
    pub fn new_session(&self, cookie_header: Option<&str>, name: &str) -> (Session, Option<Error>) {
        let mut session = Session::new(name, self.options.clone());
        let mut decode_err = None;

        let token = cookie_header.and_then(|header| cookie::find_cookie(header, name));
        if let Some(token) = token {
            match decode_multi(&self.codecs, name, &token) {
                Ok(id) => {
                    session.id = id;
                    if let Some(stored) = self.cache.value(name) {
                        match deep_copy(&stored) {
                            Ok(values) => session.values = values,
                            Err(err) => {
                                // Accepted data-loss case: the session
                                // proceeds with empty values.
                                debug!(
                                    session = name,
                                    error = %err,
                                    "cached values could not be copied, starting empty"
                                );
                            }
                        }
                        session.is_new = false;
                    }
                }
                Err(err) => decode_err = Some(Error::Codec(err)),
            }
        }

        (session, decode_err)
    }

    /// Persist the session and return the `Set-Cookie` header value to emit.
    ///
    /// A negative `max_age` on the session's options deletes instead: the
    /// cache entry is removed, the session's values are cleared in place and
    /// the returned cookie clears the client side.
    ///
    /// The cache is updated before the cookie token is encoded; if encoding
    /// fails the new values stay cached even though no cookie reaches the
    /// client, and a previously issued cookie keeps resolving to them.
    pub fn save(&self, session: &mut Session) -> Result<String, Error> {
        if session.options.max_age < 0 {
            self.cache.delete(session.name());
            session.values.clear();
            debug!(session = session.name(), "session deleted");
            return Ok(cookie::header_value(session.name(), "", &session.options));
        }

        let values = deep_copy(&session.values)?;
        self.cache.set_value(session.name(), values);

        let token = encode_multi(&self.codecs, session.name(), &session.id)?;
        debug!(session = session.name(), "session saved");
        Ok(cookie::header_value(session.name(), &token, &session.options))
    }
}
