use std::fmt;

use thiserror::Error;

use crate::schema::Field;

/// Errors that can occur while configuring or using trust assertions.
#[derive(Debug, Error)]
pub enum Error {
    /// An assertion was built with a missing or unrepresentable field
    #[error("malformed assertion: {field} {reason}")]
    MalformedAssertion {
        /// The offending field
        field: Field,
        /// Why the field was refused
        reason: &'static str,
    },

    /// A prefix is not a usable header-name token
    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix {
        /// The prefix as supplied
        prefix: String,
        /// Why the prefix was refused
        reason: &'static str,
    },

    /// Two reserved prefixes overlap so one namespace contains the other
    #[error("ambiguous prefixes '{first}' and '{second}'")]
    AmbiguousPrefix {
        /// The prefix already in the set
        first: String,
        /// The prefix that collides with it
        second: String,
    },

    /// A header collection could not store a name or value
    #[error("header '{name}' cannot be stored")]
    InvalidHeader {
        /// The header name involved
        name: String,
    },

    /// Startup configuration is incomplete or inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// An assertion failed verification
    #[error("assertion rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Why an inbound assertion was not trusted.
///
/// None of the variants carry signature or key material, so a `Rejection`
/// can be logged or returned to the caller as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// One or more of the five headers was missing or unreadable
    Missing,
    /// The asserted method differs from the observed request method
    MethodMismatch,
    /// The asserted path differs from the observed request path
    PathMismatch,
    /// The MAC does not match the recomputed value
    BadSignature,
    /// The assertion is older than the freshness window allows
    Expired {
        /// How old the assertion was, in milliseconds
        age_ms: u64,
    },
    /// The assertion was minted further in the future than the skew allowance
    FromFuture {
        /// How far ahead of the local clock it was, in milliseconds
        ahead_ms: u64,
    },
}

impl Rejection {
    /// Short machine-friendly label, used as a log field.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Missing => "missing",
            Rejection::MethodMismatch => "method_mismatch",
            Rejection::PathMismatch => "path_mismatch",
            Rejection::BadSignature => "bad_signature",
            Rejection::Expired { .. } => "expired",
            Rejection::FromFuture { .. } => "from_future",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Missing => write!(f, "no complete assertion present"),
            Rejection::MethodMismatch => write!(f, "asserted method does not match request"),
            Rejection::PathMismatch => write!(f, "asserted path does not match request"),
            Rejection::BadSignature => write!(f, "signature mismatch"),
            Rejection::Expired { age_ms } => write!(f, "assertion expired ({} ms old)", age_ms),
            Rejection::FromFuture { ahead_ms } => {
                write!(f, "assertion timestamp {} ms in the future", ahead_ms)
            }
        }
    }
}

impl std::error::Error for Rejection {}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
