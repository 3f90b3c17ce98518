//! In-memory session store for HTTP applications.
//!
//! Session values live server-side in a process-local cache keyed by
//! session name; the client holds an authenticated, optionally encrypted
//! cookie that references the entry without carrying it. The store is
//! transport-agnostic: it consumes a raw `Cookie` request-header value and
//! produces a `Set-Cookie` response-header value, leaving the HTTP plumbing
//! to the embedding application.
//!
//! Suitable for use in tests and development environments. Do not use in
//! production: nothing survives a process restart, nothing is shared across
//! processes, entries are never evicted and memory use is unbounded.
//!
//! ```
//! use memstore::{KeyPair, MemStore, Registry};
//!
//! let store = MemStore::new(&[KeyPair::new(b"auth-key-123", None)]).unwrap();
//!
//! // First request: no cookie yet, so the session starts new and empty.
//! let mut registry = Registry::new();
//! let (session, err) = registry.get(&store, None, "sid");
//! assert!(err.is_none());
//! assert!(session.is_new());
//! session.insert("username", "foobar").unwrap();
//! let set_cookie = store.save(session).unwrap();
//!
//! // Next request presents the cookie and sees the saved values.
//! let cookie_header = set_cookie.split(';').next().unwrap().to_string();
//! let mut registry = Registry::new();
//! let (session, err) = registry.get(&store, Some(&cookie_header), "sid");
//! assert!(err.is_none());
//! assert!(!session.is_new());
//! assert_eq!(session.get::<String>("username").as_deref(), Some("foobar"));
//! ```

mod cache;
pub mod codec;
pub mod cookie;
mod error;
pub mod session;
mod store;
mod values;

pub use codec::{Codec, CodecError, KeyPair, SecureCookie};
pub use cookie::{CookieOptions, SameSite};
pub use error::Error;
pub use session::{Registry, Session};
pub use store::MemStore;
pub use values::Values;
