use crate::schema::Prefix;

/// Proof that an inbound assertion passed signature and freshness checks.
///
/// # Construction Invariants
///
/// A `VerifiedIdentity` cannot be built outside this crate. The only way to
/// obtain one is through [`Verifier`](crate::Verifier) (directly or via
/// [`TrustBoundary`](crate::TrustBoundary)), so a function taking a
/// `VerifiedIdentity` parameter cannot be handed an unverified claim.
///
/// ```compile_fail
/// use trust_headers::VerifiedIdentity;
///
/// // This will not compile - no public constructor:
/// let identity = VerifiedIdentity::new("admin", "GET", "/", 0, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    user_id: String,
    method: String,
    path: String,
    issued_at: u64,
    prefix: Option<Prefix>,
}

impl VerifiedIdentity {
    /// Only called by the verifier after every check succeeded.
    pub(crate) fn new(
        user_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        issued_at: u64,
        prefix: Option<Prefix>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            method: method.into(),
            path: path.into(),
            issued_at,
            prefix,
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// The authenticated principal.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The method the assertion authorized, equal to the observed one.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The path the assertion authorized, equal to the observed one.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// When the assertion was minted, in milliseconds since the Unix epoch.
    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    /// The prefix the assertion was read from, when known.
    pub fn prefix(&self) -> Option<&Prefix> {
        self.prefix.as_ref()
    }
}
