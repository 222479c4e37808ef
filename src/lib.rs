//! Header-carried HMAC trust assertions for internal HTTP hops.
//!
//! Trusted components of a service (an edge layer, a backend, internal
//! services) use this crate to tell each other who the caller is and which
//! request that caller is authorizing, without cookies or bearer tokens that
//! end users could see or replay.
//!
//! An assertion travels as five headers under a namespace prefix:
//! `{prefix}-user`, `{prefix}-ts`, `{prefix}-sig`, `{prefix}-method` and
//! `{prefix}-path`. The signature is HMAC-SHA256 over the other four.
//!
//! # Core Types
//!
//! - [`Assertion`]: A complete five-field claim
//! - [`Prefix`] / [`ReservedPrefixes`]: Header namespaces and the closed set
//!   the guard protects
//! - [`strip`]: Injection guard removing client-supplied internal headers
//! - [`write`] / [`read`]: Serialize and parse assertions
//! - [`Signer`] / [`Verifier`]: MAC computation, constant-time checking and
//!   the freshness window
//! - [`TrustConfig`]: Immutable process-wide configuration
//! - [`TrustBoundary`]: The above composed over [`http::Request`]
//! - [`VerifiedIdentity`]: Proof an assertion passed verification
//!
//! # Examples
//!
//! ```
//! use http::{HeaderMap, HeaderValue, Method};
//! use trust_headers::{read, strip, write, Prefix, SigningKey, TrustConfig};
//!
//! let config = TrustConfig::builder()
//!     .reserve("int")
//!     .signing_key(SigningKey::new(vec![7u8; 32]))
//!     .build()
//!     .unwrap();
//! let int = Prefix::parse("int").unwrap();
//!
//! // An untrusted request arrives carrying a forged header.
//! let mut headers = HeaderMap::new();
//! headers.insert("int-user", HeaderValue::from_static("admin"));
//!
//! // Strip first, then stamp the identity established elsewhere.
//! strip(&mut headers, config.reserved());
//! let assertion = config.signer().sign("u1", &Method::GET, "/x", 1_000).unwrap();
//! write(&mut headers, &assertion, &int);
//!
//! // The next hop parses and verifies against what it actually serves.
//! let parsed = read(&headers, &int).expect("complete assertion");
//! let identity = config.verifier().verify_at(&parsed, &Method::GET, "/x", 1_500).unwrap();
//! assert_eq!(identity.user_id(), "u1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assertion;
pub mod audit;
mod boundary;
pub mod config;
mod error;
mod guard;
mod reader;
mod schema;
mod secret;
mod signer;
mod store;
mod verified;
mod verifier;
mod writer;

pub use assertion::Assertion;
pub use boundary::TrustBoundary;
pub use config::{TrustConfig, TrustConfigBuilder};
pub use error::{Error, Rejection, Result};
pub use guard::strip;
pub use reader::read;
pub use schema::{Field, Prefix, ReservedPrefixes};
pub use secret::{SigningKey, MIN_KEY_LEN};
pub use signer::{canonical_string, now_millis, Signer, CANONICAL_DELIMITER};
pub use store::HeaderStore;
pub use verified::VerifiedIdentity;
pub use verifier::{FreshnessWindow, Verifier, DEFAULT_MAX_AGE, DEFAULT_MAX_SKEW};
pub use writer::write;
