use std::fmt;

use crate::error::{Error, Result};
use crate::schema::Field;

/// A five-field identity and intent claim carried between trusted hops.
///
/// An `Assertion` is always complete: every field is present, non-empty and
/// representable as an HTTP header value. There is no partially populated
/// assertion. Incoming headers that do not form a complete assertion are
/// reported as absent by [`read`](crate::read) instead.
///
/// Fields are opaque strings. Comparing `method` and `path` against the
/// request actually being served is the job of [`Verifier`](crate::Verifier).
///
/// # Examples
///
/// ```
/// use trust_headers::Assertion;
///
/// let assertion = Assertion::new("u1", "GET", "/x", 1000, "abc").unwrap();
/// assert_eq!(assertion.user_id(), "u1");
/// assert_eq!(assertion.timestamp(), 1000);
///
/// assert!(Assertion::new("", "GET", "/x", 1000, "abc").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Assertion {
    user_id: String,
    method: String,
    path: String,
    timestamp: u64,
    signature: String,
}

impl Assertion {
    /// Builds an assertion from its five fields.
    ///
    /// Callers normally obtain assertions from [`Signer`](crate::Signer);
    /// this constructor exists for readers and for tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAssertion`] if any string field is empty or
    /// contains bytes that cannot appear in a header value.
    pub fn new(
        user_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        timestamp: u64,
        signature: impl Into<String>,
    ) -> Result<Self> {
        let assertion = Self {
            user_id: user_id.into(),
            method: method.into(),
            path: path.into(),
            timestamp,
            signature: signature.into(),
        };

        check_value(Field::User, &assertion.user_id)?;
        check_value(Field::Method, &assertion.method)?;
        check_value(Field::Path, &assertion.path)?;
        check_value(Field::Signature, &assertion.signature)?;

        Ok(assertion)
    }

    /// The authenticated principal.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The HTTP method being authorized.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request path being authorized.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Mint time, milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The MAC binding the other fields together.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Header value for one field, as written on the wire.
    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::User => self.user_id.clone(),
            Field::Timestamp => self.timestamp.to_string(),
            Field::Signature => self.signature.clone(),
            Field::Method => self.method.clone(),
            Field::Path => self.path.clone(),
        }
    }
}

// A captured signature can be replayed inside the freshness window, so it
// stays out of debug output.
impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("user_id", &self.user_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("timestamp", &self.timestamp)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Header values accept visible ASCII, space and horizontal tab.
pub(crate) fn is_header_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}

fn check_value(field: Field, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::MalformedAssertion {
            field,
            reason: "is empty",
        });
    }
    if !is_header_safe(value) {
        return Err(Error::MalformedAssertion {
            field,
            reason: "contains bytes not allowed in a header value",
        });
    }
    Ok(())
}
