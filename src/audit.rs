//! Structured trust-decision events.
//!
//! Events are emitted through `tracing` under the `trust_headers::audit`
//! target so deployments can route them separately from application logs.
//! Only safe metadata is recorded: header names, principals, methods, paths
//! and rejection reasons. Signatures and keys never appear.

use crate::error::Rejection;

/// Target shared by every audit event.
pub const TARGET: &str = "trust_headers::audit";

/// Reserved headers were found on an inbound request and removed.
pub(crate) fn headers_stripped(names: &[String], values: usize) {
    tracing::warn!(
        target: TARGET,
        stripped = names.len(),
        values,
        names = ?names,
        "stripped reserved headers from inbound request"
    );
}

/// An assertion passed every check.
pub(crate) fn assertion_accepted(user_id: &str, method: &str, path: &str) {
    tracing::debug!(
        target: TARGET,
        user_id = %user_id,
        method = %method,
        path = %path,
        "assertion accepted"
    );
}

/// An assertion failed verification.
pub(crate) fn assertion_rejected(rejection: &Rejection, method: &str, path: &str) {
    tracing::warn!(
        target: TARGET,
        reason = rejection.reason(),
        detail = %rejection,
        method = %method,
        path = %path,
        "assertion rejected"
    );
}

/// No complete assertion was found under a prefix.
pub(crate) fn assertion_missing(prefix: &str, method: &str, path: &str) {
    tracing::info!(
        target: TARGET,
        prefix = %prefix,
        method = %method,
        path = %path,
        "no assertion present"
    );
}
