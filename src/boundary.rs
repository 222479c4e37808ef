//! Request-level composition of guard, signer, writer, reader and verifier.
//!
//! The lower-level functions work on any [`HeaderStore`](crate::HeaderStore);
//! this module wires them together for [`http::Request`] values the way a
//! routing layer would:
//!
//! ```text
//! untrusted request
//!   ↓ stamp(): strip reserved headers, sign method + path, write assertion
//! next hop
//!   ↓ authenticate(): read assertion, verify against observed method + path
//! VerifiedIdentity
//! ```
//!
//! Stripping always happens before writing, and it covers every reserved
//! prefix, not just the one about to be written.

use std::sync::Arc;

use http::Request;

use crate::audit;
use crate::config::TrustConfig;
use crate::error::{Error, Rejection, Result};
use crate::guard::strip;
use crate::reader::read;
use crate::schema::Prefix;
use crate::signer::now_millis;
use crate::verified::VerifiedIdentity;
use crate::writer::write;

/// Applies the trust scheme to whole requests.
///
/// Cheap to clone; every clone shares the same immutable configuration.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use http::Request;
/// use trust_headers::{SigningKey, TrustBoundary, TrustConfig};
///
/// let config = TrustConfig::builder()
///     .reserve("int")
///     .signing_key(SigningKey::new(vec![7u8; 32]))
///     .build()
///     .unwrap();
/// let boundary = TrustBoundary::new(Arc::new(config));
///
/// // Edge: the caller has been authenticated as "u1" by other means.
/// let mut request = Request::get("/threads")
///     .header("int-user", "admin") // forged by the client
///     .body(())
///     .unwrap();
/// boundary.stamp(&mut request, "u1").unwrap();
///
/// // Backend: trust only what verifies.
/// let identity = boundary.authenticate(&request, boundary.config().egress_prefix()).unwrap();
/// assert_eq!(identity.user_id(), "u1");
/// ```
#[derive(Debug, Clone)]
pub struct TrustBoundary {
    config: Arc<TrustConfig>,
}

impl TrustBoundary {
    /// Creates a boundary over a shared configuration.
    pub fn new(config: Arc<TrustConfig>) -> Self {
        Self { config }
    }

    /// The shared configuration.
    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Strips every reserved header from an inbound request.
    ///
    /// Returns the number of header names removed.
    pub fn sanitize<B>(&self, request: &mut Request<B>) -> usize {
        strip(request.headers_mut(), self.config.reserved())
    }

    /// Strips reserved headers, then stamps a fresh assertion for `user_id`
    /// under the configured egress prefix.
    ///
    /// The assertion binds the request's own method and path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAssertion`](crate::Error::MalformedAssertion)
    /// if `user_id` or the request path cannot be carried in a header.
    pub fn stamp<B>(&self, request: &mut Request<B>, user_id: &str) -> Result<()> {
        let prefix = self.config.egress_prefix().clone();
        self.stamp_as(request, &prefix, user_id, now_millis())
    }

    /// Like [`stamp`](Self::stamp) with an explicit prefix and clock.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `prefix` is not reserved, since the next hop's
    /// guard would not strip forgeries under it. Otherwise see
    /// [`stamp`](Self::stamp).
    pub fn stamp_as<B>(
        &self,
        request: &mut Request<B>,
        prefix: &Prefix,
        user_id: &str,
        now: u64,
    ) -> Result<()> {
        if !self.config.reserved().contains(prefix) {
            return Err(Error::Config(format!(
                "refusing to stamp under unreserved prefix '{}'",
                prefix
            )));
        }

        self.sanitize(request);

        let path = request.uri().path().to_string();
        let assertion = self
            .config
            .signer()
            .sign(user_id, request.method(), &path, now)?;

        write(request.headers_mut(), &assertion, prefix);
        Ok(())
    }

    /// Reads and verifies the assertion under `prefix` against the request's
    /// observed method and path, using the system clock.
    ///
    /// # Errors
    ///
    /// [`Rejection::Missing`] when no complete assertion is present,
    /// otherwise whichever check failed.
    pub fn authenticate<B>(
        &self,
        request: &Request<B>,
        prefix: &Prefix,
    ) -> Result<VerifiedIdentity, Rejection> {
        self.authenticate_at(request, prefix, now_millis())
    }

    /// Like [`authenticate`](Self::authenticate) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`authenticate`](Self::authenticate).
    pub fn authenticate_at<B>(
        &self,
        request: &Request<B>,
        prefix: &Prefix,
        now: u64,
    ) -> Result<VerifiedIdentity, Rejection> {
        let method = request.method();
        let path = request.uri().path();

        let Some(assertion) = read(request.headers(), prefix) else {
            audit::assertion_missing(prefix.as_str(), method.as_str(), path);
            return Err(Rejection::Missing);
        };

        self.config
            .verifier()
            .verify_at(&assertion, method, path, now)
            .map(|identity| identity.with_prefix(prefix.clone()))
    }
}
