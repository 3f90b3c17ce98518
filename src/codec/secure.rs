//! HMAC-authenticated, optionally AES-GCM-encrypted cookie tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{Codec, CodecError};

type Aes192Gcm = AesGcm<Aes192, <Aes128Gcm as AeadCore>::NonceSize>;
type HmacSha256 = Hmac<Sha256>;

/// GCM nonce length, prepended to each ciphertext.
const NONCE_LEN: usize = 12;

/// Default maximum token age: 30 days.
const DEFAULT_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// AES-GCM cipher selected by encryption key length.
enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Cipher::Aes128(_) => "Aes128",
            Cipher::Aes192(_) => "Aes192",
            Cipher::Aes256(_) => "Aes256",
        };
        f.debug_tuple(variant).finish()
    }
}

impl Cipher {
    fn new(key: &[u8]) -> Result<Self, CodecError> {
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key)
                .map(Cipher::Aes128)
                .map_err(|_| CodecError::KeyLength(key.len())),
            24 => Aes192Gcm::new_from_slice(key)
                .map(Cipher::Aes192)
                .map_err(|_| CodecError::KeyLength(key.len())),
            32 => Aes256Gcm::new_from_slice(key)
                .map(Cipher::Aes256)
                .map_err(|_| CodecError::KeyLength(key.len())),
            n => Err(CodecError::KeyLength(n)),
        }
    }

    /// Encrypt, returning `nonce || ciphertext`.
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        // Every AES-GCM variant here uses the same 96-bit nonce.
        let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
        let ciphertext = match self {
            Cipher::Aes128(cipher) => cipher.encrypt(&nonce, plaintext),
            Cipher::Aes192(cipher) => cipher.encrypt(&nonce, plaintext),
            Cipher::Aes256(cipher) => cipher.encrypt(&nonce, plaintext),
        }
        .map_err(|_| CodecError::Encrypt)?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt `nonce || ciphertext`.
    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
        if sealed.len() < NONCE_LEN {
            return Err(CodecError::Malformed);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce);

        match self {
            Cipher::Aes128(cipher) => cipher.decrypt(nonce, ciphertext),
            Cipher::Aes192(cipher) => cipher.decrypt(nonce, ciphertext),
            Cipher::Aes256(cipher) => cipher.decrypt(nonce, ciphertext),
        }
        .map_err(|_| CodecError::Decrypt)
    }
}

/// Authenticated cookie token codec.
///
/// Tokens carry a unix timestamp, the (optionally encrypted) payload and an
/// HMAC-SHA256 tag over `name|timestamp|payload`, so a token minted for one
/// cookie name never verifies under another.
#[derive(Debug)]
pub struct SecureCookie {
    mac: HmacSha256,
    cipher: Option<Cipher>,
    max_age_secs: Option<u64>,
}

impl SecureCookie {
    /// Create a codec from an authentication key and an optional encryption
    /// key (16, 24 or 32 bytes for AES-128/192/256-GCM).
    pub fn new(auth_key: &[u8], encryption_key: Option<&[u8]>) -> Result<Self, CodecError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(auth_key)
            .map_err(|_| CodecError::KeyLength(auth_key.len()))?;
        let cipher = match encryption_key {
            Some(key) => Some(Cipher::new(key)?),
            None => None,
        };

        Ok(Self {
            mac,
            cipher,
            max_age_secs: Some(DEFAULT_MAX_AGE_SECS),
        })
    }

    /// Change the token freshness window, or disable the check with `None`.
    pub fn with_max_age(mut self, max_age_secs: Option<u64>) -> Self {
        self.max_age_secs = max_age_secs;
        self
    }

    fn keyed_mac(&self, name: &str, timestamp: u64, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(name.as_bytes());
        mac.update(b"|");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b"|");
        mac.update(payload.as_bytes());
        mac
    }

    fn encode_at(&self, name: &str, value: &str, timestamp: u64) -> Result<String, CodecError> {
        let payload = match &self.cipher {
            Some(cipher) => cipher.seal(value.as_bytes())?,
            None => value.as_bytes().to_vec(),
        };
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let tag = self
            .keyed_mac(name, timestamp, &payload)
            .finalize()
            .into_bytes();
        let token = format!("{}|{}|{}", timestamp, payload, URL_SAFE_NO_PAD.encode(tag));
        Ok(URL_SAFE_NO_PAD.encode(token))
    }
}

impl Codec for SecureCookie {
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError> {
        self.encode_at(name, value, unix_now())
    }

    fn decode(&self, name: &str, token: &str) -> Result<String, CodecError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CodecError::Malformed)?;
        let raw = String::from_utf8(raw).map_err(|_| CodecError::Malformed)?;

        let mut parts = raw.splitn(3, '|');
        let (timestamp, payload, tag) = match (parts.next(), parts.next(), parts.next()) {
            (Some(timestamp), Some(payload), Some(tag)) => (timestamp, payload, tag),
            _ => return Err(CodecError::Malformed),
        };

        let timestamp: u64 = timestamp.parse().map_err(|_| CodecError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| CodecError::Malformed)?;

        // Verify before trusting anything else in the token.
        self.keyed_mac(name, timestamp, payload)
            .verify_slice(&tag)
            .map_err(|_| CodecError::BadSignature)?;

        if let Some(max_secs) = self.max_age_secs {
            let age_secs = unix_now().saturating_sub(timestamp);
            if age_secs > max_secs {
                return Err(CodecError::Expired { age_secs, max_secs });
            }
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CodecError::Malformed)?;
        let plaintext = match &self.cipher {
            Some(cipher) => cipher.open(&payload)?,
            None => payload,
        };

        String::from_utf8(plaintext).map_err(|_| CodecError::Malformed)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
