//! Error types surfaced by the session store.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors returned by session fetch and save operations.
///
/// A `Codec` error on the fetch path is informational: the caller still
/// receives a usable empty session alongside it. On the save path any error
/// aborts the emission of the cookie.
#[derive(Debug, Error)]
pub enum Error {
    /// The cookie token failed authentication, decryption or freshness checks.
    #[error("cookie token rejected: {0}")]
    Codec(#[from] CodecError),

    /// Session values could not be encoded for the isolation copy.
    #[error("session values could not be encoded: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// An encoded value bundle could not be decoded back.
    #[error("session values could not be decoded: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A value handed to the session is not representable as a session value.
    #[error("value is not representable as a session value: {0}")]
    Value(#[from] serde_json::Error),
}
