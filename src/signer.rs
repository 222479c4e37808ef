//! Signature computation.
//!
//! The MAC is HMAC-SHA256 over the canonical signing string
//!
//! ```text
//! {method}\n{path}\n{timestamp}\n{user_id}
//! ```
//!
//! rendered as lowercase hex. Header values cannot contain `\n`, so no field
//! can smuggle a delimiter and shift the others.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use http::Method;
use sha2::Sha256;

use crate::assertion::Assertion;
use crate::error::{Error, Result};
use crate::secret::SigningKey;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Delimiter between fields of the canonical signing string.
pub const CANONICAL_DELIMITER: char = '\n';

/// Builds the canonical signing string shared by signer and verifier.
///
/// # Examples
///
/// ```
/// use trust_headers::canonical_string;
///
/// assert_eq!(canonical_string("GET", "/x", 1000, "u1"), "GET\n/x\n1000\nu1");
/// ```
pub fn canonical_string(method: &str, path: &str, timestamp: u64, user_id: &str) -> String {
    let d = CANONICAL_DELIMITER;
    format!("{method}{d}{path}{d}{timestamp}{d}{user_id}")
}

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// A clock set before 1970 reads as zero.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

pub(crate) fn keyed_mac(key: &SigningKey, canonical: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.expose_secret()).ok()?;
    mac.update(canonical.as_bytes());
    Some(mac)
}

/// Mints signed assertions.
///
/// Obtained from [`TrustConfig::signer`](crate::TrustConfig::signer); it
/// borrows the configured key and cannot outlive the configuration.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use trust_headers::{SigningKey, TrustConfig};
///
/// let config = TrustConfig::builder()
///     .reserve("int")
///     .signing_key(SigningKey::new(vec![7u8; 32]))
///     .build()
///     .unwrap();
///
/// let assertion = config.signer().sign("u1", &Method::GET, "/x", 1000).unwrap();
/// assert_eq!(assertion.signature().len(), 64);
/// ```
#[derive(Debug)]
pub struct Signer<'a> {
    key: &'a SigningKey,
}

impl<'a> Signer<'a> {
    pub(crate) fn new(key: &'a SigningKey) -> Self {
        Self { key }
    }

    /// Signs an assertion for `user_id` performing `method path` at
    /// `timestamp` (milliseconds since the Unix epoch).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAssertion`] if `user_id` or `path` is empty
    /// or not header-safe.
    pub fn sign(
        &self,
        user_id: &str,
        method: &Method,
        path: &str,
        timestamp: u64,
    ) -> Result<Assertion> {
        let canonical = canonical_string(method.as_str(), path, timestamp, user_id);
        let mac = keyed_mac(self.key, &canonical)
            .ok_or_else(|| Error::Config("signing key rejected by HMAC".to_string()))?;
        let signature = hex::encode(mac.finalize().into_bytes());

        Assertion::new(user_id, method.as_str(), path, timestamp, signature)
    }

    /// Signs with the current system time.
    ///
    /// # Errors
    ///
    /// See [`sign`](Self::sign).
    pub fn sign_now(&self, user_id: &str, method: &Method, path: &str) -> Result<Assertion> {
        self.sign(user_id, method, path, now_millis())
    }
}
