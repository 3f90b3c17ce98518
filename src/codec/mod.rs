//! Authenticated cookie token codec.
//!
//! A codec turns an opaque session identifier into a tamper-evident,
//! optionally encrypted cookie token and back. Stores hold a list of codecs
//! to support key rotation: the first codec signs new tokens, every codec is
//! tried in order when decoding.

mod secure;

pub use secure::SecureCookie;

use thiserror::Error;

/// Converts session identifiers to and from opaque cookie tokens.
pub trait Codec {
    /// Produce a token authenticating `value` under the cookie `name`.
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError>;

    /// Recover the value from `token`, verifying it was issued for `name`.
    fn decode(&self, name: &str, token: &str) -> Result<String, CodecError>;
}

/// Failures produced while encoding or decoding cookie tokens.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codecs are configured, so nothing can be signed or verified.
    #[error("no codecs configured")]
    NoCodecs,

    /// The encryption key length maps to no AES variant.
    #[error("encryption key must be 16, 24 or 32 bytes, got {0}")]
    KeyLength(usize),

    /// The token is not structurally valid.
    #[error("token is malformed")]
    Malformed,

    /// The token's authentication tag does not match.
    #[error("token signature mismatch")]
    BadSignature,

    /// The token timestamp is older than the codec allows.
    #[error("token is {age_secs}s old, maximum is {max_secs}s")]
    Expired { age_secs: u64, max_secs: u64 },

    /// The payload could not be encrypted.
    #[error("payload could not be encrypted")]
    Encrypt,

    /// The payload could not be decrypted.
    #[error("payload could not be decrypted")]
    Decrypt,
}

/// One key pair supplied at store construction.
///
/// The authentication key feeds HMAC-SHA256 and is required; the encryption
/// key is optional and must be 16, 24 or 32 bytes long, selecting
/// AES-128/192/256-GCM.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub auth: Vec<u8>,
    pub encryption: Option<Vec<u8>>,
}

impl KeyPair {
    pub fn new(auth: impl Into<Vec<u8>>, encryption: Option<Vec<u8>>) -> Self {
        Self {
            auth: auth.into(),
            encryption,
        }
    }
}

/// Build one codec per key pair, in rotation order.
pub fn codecs_from_pairs(pairs: &[KeyPair]) -> Result<Vec<SecureCookie>, CodecError> {
    pairs
        .iter()
        .map(|pair| SecureCookie::new(&pair.auth, pair.encryption.as_deref()))
        .collect()
}

/// Encode with the first (newest) codec.
pub fn encode_multi<C: Codec>(codecs: &[C], name: &str, value: &str) -> Result<String, CodecError> {
    let codec = codecs.first().ok_or(CodecError::NoCodecs)?;
    codec.encode(name, value)
}

/// Try every codec in order; the last failure is returned if none succeeds.
pub fn decode_multi<C: Codec>(codecs: &[C], name: &str, token: &str) -> Result<String, CodecError> {
    let mut last = CodecError::NoCodecs;
    for codec in codecs {
        match codec.decode(name, token) {
            Ok(value) => return Ok(value),
            Err(err) => last = err,
        }
    }
    Err(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_multi_without_codecs() {
        let codecs: Vec<SecureCookie> = Vec::new();
        let err = encode_multi(&codecs, "sid", "value").unwrap_err();
        assert!(matches!(err, CodecError::NoCodecs));
    }

    #[test]
    fn test_decode_multi_without_codecs() {
        let codecs: Vec<SecureCookie> = Vec::new();
        let err = decode_multi(&codecs, "sid", "token").unwrap_err();
        assert!(matches!(err, CodecError::NoCodecs));
    }

    #[test]
    fn test_key_rotation_decodes_old_tokens() {
        let old_pair = KeyPair::new(b"old-auth-key", None);
        let new_pair = KeyPair::new(b"new-auth-key", Some(b"enckey1234567890".to_vec()));

        let old_codecs = codecs_from_pairs(&[old_pair.clone()]).unwrap();
        let token = encode_multi(&old_codecs, "sid", "id-123").unwrap();

        // After rotation the new pair comes first and still accepts the old token.
        let rotated = codecs_from_pairs(&[new_pair, old_pair]).unwrap();
        let value = decode_multi(&rotated, "sid", &token).unwrap();
        assert_eq!(value, "id-123");
    }

    #[test]
    fn test_new_tokens_use_the_first_pair() {
        let pairs = [
            KeyPair::new(b"new-auth-key", None),
            KeyPair::new(b"old-auth-key", None),
        ];
        let codecs = codecs_from_pairs(&pairs).unwrap();
        let token = encode_multi(&codecs, "sid", "id-123").unwrap();

        // Only the first codec can verify a freshly encoded token.
        let first_only = codecs_from_pairs(&pairs[..1]).unwrap();
        let second_only = codecs_from_pairs(&pairs[1..]).unwrap();
        assert!(decode_multi(&first_only, "sid", &token).is_ok());
        assert!(decode_multi(&second_only, "sid", &token).is_err());
    }

    #[test]
    fn test_bad_encryption_key_length_is_rejected() {
        let pairs = [KeyPair::new(b"auth", Some(b"short".to_vec()))];
        let err = codecs_from_pairs(&pairs).unwrap_err();
        assert!(matches!(err, CodecError::KeyLength(5)));
    }
}
