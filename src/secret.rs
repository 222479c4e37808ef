use std::fmt;

use crate::error::{Error, Result};

/// Shortest signing key accepted by [`TrustConfig`](crate::TrustConfig), in
/// bytes. Matches the HMAC-SHA256 output size.
pub const MIN_KEY_LEN: usize = 32;

/// The shared secret used to sign and verify assertions.
///
/// Key bytes never appear in formatted output. They can only be read
/// through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use trust_headers::SigningKey;
///
/// let key = SigningKey::from_hex(&"ab".repeat(32)).unwrap();
/// assert_eq!(key.len(), 32);
/// assert_eq!(format!("{:?}", key), "SigningKey([REDACTED])");
/// ```
// Do NOT derive Clone, Debug or Default: each would let key material be
// duplicated or printed without going through expose_secret().
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    /// Wraps raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Decodes a hex-encoded key, as stored in environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the input is not valid hex. The input
    /// itself is not echoed into the error.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        hex::decode(encoded.trim())
            .map(Self::new)
            .map_err(|_| Error::Config("signing key is not valid hex".to_string()))
    }

    /// Explicitly exposes the key bytes.
    ///
    /// Only the signer and verifier should need this. Never log the result.
    pub fn expose_secret(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

impl fmt::Display for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_redacts_debug_and_display() {
        let key = SigningKey::new(b"hunter2-hunter2-hunter2-hunter2!".to_vec());

        let debug_output = format!("{:?}", key);
        let display_output = format!("{}", key);

        assert_eq!(debug_output, "SigningKey([REDACTED])");
        assert_eq!(display_output, "[REDACTED]");
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn key_exposes_when_explicit() {
        let key = SigningKey::new(vec![1, 2, 3]);
        assert_eq!(key.expose_secret(), &[1, 2, 3]);
        assert_eq!(key.len(), 3);
    }

    #[test]
    fn from_hex_decodes_and_trims() {
        let key = SigningKey::from_hex(" 00ff10\n").unwrap();
        assert_eq!(key.expose_secret(), &[0x00, 0xff, 0x10]);
    }

    #[test]
    fn from_hex_error_does_not_echo_input() {
        let err = SigningKey::from_hex("zz-very-secret").unwrap_err();
        assert!(!err.to_string().contains("very-secret"));
    }
}
