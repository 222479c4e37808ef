//! Signature and freshness verification.

use std::time::Duration;

use hmac::Mac;
use http::Method;

use crate::assertion::Assertion;
use crate::audit;
use crate::error::Rejection;
use crate::secret::SigningKey;
use crate::signer::{canonical_string, keyed_mac, now_millis};
use crate::verified::VerifiedIdentity;

/// Default maximum assertion age.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Default allowance for assertions minted slightly in the future.
pub const DEFAULT_MAX_SKEW: Duration = Duration::from_secs(30);

/// How old, or how far in the future, an assertion may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    /// Assertions older than this are rejected as replays
    pub max_age: Duration,
    /// Assertions ahead of the local clock by more than this are rejected
    pub max_skew: Duration,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            max_skew: DEFAULT_MAX_SKEW,
        }
    }
}

impl FreshnessWindow {
    /// Checks `timestamp` against `now`, both in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Expired`] or [`Rejection::FromFuture`] when the
    /// timestamp falls outside the window. Both bounds are inclusive.
    pub fn check(&self, timestamp: u64, now: u64) -> Result<(), Rejection> {
        if timestamp > now {
            let ahead_ms = timestamp - now;
            if u128::from(ahead_ms) > self.max_skew.as_millis() {
                return Err(Rejection::FromFuture { ahead_ms });
            }
        } else {
            let age_ms = now - timestamp;
            if u128::from(age_ms) > self.max_age.as_millis() {
                return Err(Rejection::Expired { age_ms });
            }
        }
        Ok(())
    }
}

/// Checks inbound assertions against the request actually being served.
///
/// Obtained from [`TrustConfig::verifier`](crate::TrustConfig::verifier).
///
/// Verification recomputes the MAC from the *observed* method and path plus
/// the asserted user and timestamp, so an assertion minted for one request
/// cannot authorize another.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use trust_headers::{Rejection, SigningKey, TrustConfig};
///
/// let config = TrustConfig::builder()
///     .reserve("int")
///     .signing_key(SigningKey::new(vec![7u8; 32]))
///     .build()
///     .unwrap();
///
/// let assertion = config.signer().sign("u1", &Method::GET, "/x", 1_000).unwrap();
/// let verifier = config.verifier();
///
/// let identity = verifier.verify_at(&assertion, &Method::GET, "/x", 2_000).unwrap();
/// assert_eq!(identity.user_id(), "u1");
///
/// assert_eq!(
///     verifier.verify_at(&assertion, &Method::DELETE, "/x", 2_000),
///     Err(Rejection::MethodMismatch)
/// );
/// ```
#[derive(Debug)]
pub struct Verifier<'a> {
    key: &'a SigningKey,
    window: FreshnessWindow,
}

impl<'a> Verifier<'a> {
    pub(crate) fn new(key: &'a SigningKey, window: FreshnessWindow) -> Self {
        Self { key, window }
    }

    /// The freshness window this verifier enforces.
    pub fn window(&self) -> FreshnessWindow {
        self.window
    }

    /// Verifies `assertion` for a request observed as `method path` at
    /// `now` (milliseconds since the Unix epoch).
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] describing the first failed check:
    /// method, path, signature, then freshness.
    pub fn verify_at(
        &self,
        assertion: &Assertion,
        method: &Method,
        path: &str,
        now: u64,
    ) -> Result<VerifiedIdentity, Rejection> {
        let outcome = self.check(assertion, method, path, now);

        match &outcome {
            Ok(_) => audit::assertion_accepted(assertion.user_id(), method.as_str(), path),
            Err(rejection) => audit::assertion_rejected(rejection, method.as_str(), path),
        }

        outcome.map(|()| {
            VerifiedIdentity::new(
                assertion.user_id(),
                method.as_str(),
                path,
                assertion.timestamp(),
                None,
            )
        })
    }

    /// Verifies against the current system time.
    ///
    /// # Errors
    ///
    /// See [`verify_at`](Self::verify_at).
    pub fn verify(
        &self,
        assertion: &Assertion,
        method: &Method,
        path: &str,
    ) -> Result<VerifiedIdentity, Rejection> {
        self.verify_at(assertion, method, path, now_millis())
    }

    fn check(
        &self,
        assertion: &Assertion,
        method: &Method,
        path: &str,
        now: u64,
    ) -> Result<(), Rejection> {
        if assertion.method() != method.as_str() {
            return Err(Rejection::MethodMismatch);
        }
        if assertion.path() != path {
            return Err(Rejection::PathMismatch);
        }

        let claimed = hex::decode(assertion.signature()).map_err(|_| Rejection::BadSignature)?;
        let canonical = canonical_string(
            method.as_str(),
            path,
            assertion.timestamp(),
            assertion.user_id(),
        );
        let mac = keyed_mac(self.key, &canonical).ok_or(Rejection::BadSignature)?;

        // verify_slice compares in constant time
        mac.verify_slice(&claimed)
            .map_err(|_| Rejection::BadSignature)?;

        self.window.check(assertion.timestamp(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Signer;

    const NOW: u64 = 1_700_000_000_000;

    fn key() -> SigningKey {
        SigningKey::new(vec![42u8; 32])
    }

    fn signed(key: &SigningKey, timestamp: u64) -> Assertion {
        Signer::new(key)
            .sign("u1", &Method::POST, "/api/threads", timestamp)
            .unwrap()
    }

    #[test]
    fn accepts_fresh_matching_assertion() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());

        let identity = verifier
            .verify_at(&signed(&key, NOW), &Method::POST, "/api/threads", NOW + 10)
            .unwrap();

        assert_eq!(identity.user_id(), "u1");
        assert_eq!(identity.issued_at(), NOW);
    }

    #[test]
    fn rejects_observed_method_or_path_mismatch() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let assertion = signed(&key, NOW);

        assert_eq!(
            verifier.verify_at(&assertion, &Method::GET, "/api/threads", NOW),
            Err(Rejection::MethodMismatch)
        );
        assert_eq!(
            verifier.verify_at(&assertion, &Method::POST, "/api/threads/", NOW),
            Err(Rejection::PathMismatch)
        );
    }

    #[test]
    fn rejects_tampered_fields() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let good = signed(&key, NOW);

        let other_user =
            Assertion::new("admin", "POST", "/api/threads", NOW, good.signature()).unwrap();
        let other_time =
            Assertion::new("u1", "POST", "/api/threads", NOW - 1, good.signature()).unwrap();

        for forged in [other_user, other_time] {
            assert_eq!(
                verifier.verify_at(&forged, &Method::POST, "/api/threads", NOW),
                Err(Rejection::BadSignature)
            );
        }
    }

    #[test]
    fn rejects_path_swap_even_when_headers_agree() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let good = signed(&key, NOW);

        let moved = Assertion::new("u1", "POST", "/api/admin", NOW, good.signature()).unwrap();
        assert_eq!(
            verifier.verify_at(&moved, &Method::POST, "/api/admin", NOW),
            Err(Rejection::BadSignature)
        );
    }

    #[test]
    fn rejects_non_hex_and_truncated_signatures() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let good = signed(&key, NOW);

        let garbage = Assertion::new("u1", "POST", "/api/threads", NOW, "forged").unwrap();
        let truncated =
            Assertion::new("u1", "POST", "/api/threads", NOW, &good.signature()[..32]).unwrap();

        for forged in [garbage, truncated] {
            assert_eq!(
                verifier.verify_at(&forged, &Method::POST, "/api/threads", NOW),
                Err(Rejection::BadSignature)
            );
        }
    }

    #[test]
    fn accepts_uppercase_hex_signature() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let good = signed(&key, NOW);

        let upper = Assertion::new(
            "u1",
            "POST",
            "/api/threads",
            NOW,
            good.signature().to_ascii_uppercase(),
        )
        .unwrap();
        assert!(verifier
            .verify_at(&upper, &Method::POST, "/api/threads", NOW)
            .is_ok());
    }

    #[test]
    fn rejects_wrong_key() {
        let key = key();
        let other = SigningKey::new(vec![7u8; 32]);
        let verifier = Verifier::new(&other, FreshnessWindow::default());

        assert_eq!(
            verifier.verify_at(&signed(&key, NOW), &Method::POST, "/api/threads", NOW),
            Err(Rejection::BadSignature)
        );
    }

    #[test]
    fn rejects_expired_assertion() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let max_age = DEFAULT_MAX_AGE.as_millis() as u64;

        assert!(verifier
            .verify_at(&signed(&key, NOW), &Method::POST, "/api/threads", NOW + max_age)
            .is_ok());
        assert_eq!(
            verifier.verify_at(
                &signed(&key, NOW),
                &Method::POST,
                "/api/threads",
                NOW + max_age + 1
            ),
            Err(Rejection::Expired {
                age_ms: max_age + 1
            })
        );
    }

    #[test]
    fn rejects_assertion_from_the_future() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let skew = DEFAULT_MAX_SKEW.as_millis() as u64;

        assert!(verifier
            .verify_at(&signed(&key, NOW + skew), &Method::POST, "/api/threads", NOW)
            .is_ok());
        assert_eq!(
            verifier.verify_at(
                &signed(&key, NOW + skew + 1),
                &Method::POST,
                "/api/threads",
                NOW
            ),
            Err(Rejection::FromFuture { ahead_ms: skew + 1 })
        );
    }

    #[test]
    fn custom_window_is_enforced() {
        let key = key();
        let window = FreshnessWindow {
            max_age: Duration::from_secs(1),
            max_skew: Duration::ZERO,
        };
        let verifier = Verifier::new(&key, window);

        assert!(matches!(
            verifier.verify_at(&signed(&key, NOW), &Method::POST, "/api/threads", NOW + 1_001),
            Err(Rejection::Expired { .. })
        ));
        assert!(matches!(
            verifier.verify_at(&signed(&key, NOW + 1), &Method::POST, "/api/threads", NOW),
            Err(Rejection::FromFuture { ahead_ms: 1 })
        ));
    }

    #[test]
    fn verify_uses_system_clock() {
        let key = key();
        let verifier = Verifier::new(&key, FreshnessWindow::default());
        let fresh = Signer::new(&key)
            .sign_now("u1", &Method::GET, "/x")
            .unwrap();

        assert!(verifier.verify(&fresh, &Method::GET, "/x").is_ok());
        assert!(matches!(
            verifier.verify(&signed(&key, 1_000), &Method::POST, "/api/threads"),
            Err(Rejection::Expired { .. })
        ));
    }
}
