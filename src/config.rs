//! Process-wide trust configuration.
//!
//! A [`TrustConfig`] is built once at startup, either in code through
//! [`TrustConfig::builder`] or from the environment with
//! [`TrustConfig::from_env`], and then shared read-only (usually behind an
//! `Arc`) by every component that strips, signs or verifies.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::schema::{Prefix, ReservedPrefixes};
use crate::secret::{SigningKey, MIN_KEY_LEN};
use crate::signer::Signer;
use crate::verifier::{FreshnessWindow, Verifier};

/// Hex-encoded signing key.
pub const ENV_SECRET: &str = "TRUST_HEADERS_SECRET";
/// Comma-separated reserved prefixes.
pub const ENV_PREFIXES: &str = "TRUST_HEADERS_PREFIXES";
/// Maximum assertion age in seconds.
pub const ENV_MAX_AGE_SECS: &str = "TRUST_HEADERS_MAX_AGE_SECS";
/// Future clock-skew allowance in seconds.
pub const ENV_MAX_SKEW_SECS: &str = "TRUST_HEADERS_MAX_SKEW_SECS";
/// Prefix used when stamping outgoing requests.
pub const ENV_EGRESS_PREFIX: &str = "TRUST_HEADERS_EGRESS_PREFIX";

/// Immutable configuration for stripping, signing and verifying.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use trust_headers::{SigningKey, TrustConfig};
///
/// let config = TrustConfig::builder()
///     .reserve("edge")
///     .reserve("svc")
///     .egress_prefix("svc")
///     .signing_key(SigningKey::new(vec![7u8; 32]))
///     .max_age(Duration::from_secs(60))
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.reserved().len(), 2);
/// assert_eq!(config.egress_prefix().as_str(), "svc");
/// ```
#[derive(Debug)]
pub struct TrustConfig {
    reserved: ReservedPrefixes,
    egress_prefix: Prefix,
    key: SigningKey,
    window: FreshnessWindow,
}

impl TrustConfig {
    /// Starts a new builder.
    pub fn builder() -> TrustConfigBuilder {
        TrustConfigBuilder::default()
    }

    /// Builds a configuration from `TRUST_HEADERS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or any value
    /// fails validation. See [`TrustConfig::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// `TRUST_HEADERS_SECRET` and `TRUST_HEADERS_PREFIXES` are required.
    /// The egress prefix defaults to the first listed prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for missing or unparseable variables, and
    /// the usual [`build`](TrustConfigBuilder::build) errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use trust_headers::TrustConfig;
    ///
    /// let secret = "0f".repeat(32);
    /// let config = TrustConfig::from_lookup(|name| match name {
    ///     "TRUST_HEADERS_SECRET" => Some(secret.clone()),
    ///     "TRUST_HEADERS_PREFIXES" => Some("int, svc".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.egress_prefix().as_str(), "int");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", name)))
        };
        let seconds = |name: &str| -> Result<Option<Duration>> {
            lookup(name)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .map_err(|_| Error::Config(format!("{} must be whole seconds", name)))
                })
                .transpose()
        };

        let mut builder = Self::builder().signing_key(SigningKey::from_hex(&required(ENV_SECRET)?)?);

        for prefix in required(ENV_PREFIXES)?.split(',') {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                builder = builder.reserve(prefix);
            }
        }
        if let Some(prefix) = lookup(ENV_EGRESS_PREFIX) {
            builder = builder.egress_prefix(prefix.trim());
        }
        if let Some(max_age) = seconds(ENV_MAX_AGE_SECS)? {
            builder = builder.max_age(max_age);
        }
        if let Some(max_skew) = seconds(ENV_MAX_SKEW_SECS)? {
            builder = builder.max_skew(max_skew);
        }

        builder.build()
    }

    /// The prefixes stripped from inbound requests.
    pub fn reserved(&self) -> &ReservedPrefixes {
        &self.reserved
    }

    /// The prefix used when stamping outgoing requests.
    pub fn egress_prefix(&self) -> &Prefix {
        &self.egress_prefix
    }

    /// The enforced freshness window.
    pub fn window(&self) -> FreshnessWindow {
        self.window
    }

    /// A signer borrowing this configuration's key.
    pub fn signer(&self) -> Signer<'_> {
        Signer::new(&self.key)
    }

    /// A verifier borrowing this configuration's key and window.
    pub fn verifier(&self) -> Verifier<'_> {
        Verifier::new(&self.key, self.window)
    }
}

/// Builder for [`TrustConfig`].
///
/// Validation is deferred to [`build`](Self::build) so that every problem is
/// reported at one place during startup.
#[derive(Debug, Default)]
pub struct TrustConfigBuilder {
    prefixes: Vec<String>,
    egress_prefix: Option<String>,
    key: Option<SigningKey>,
    window: FreshnessWindow,
}

impl TrustConfigBuilder {
    /// Adds a reserved prefix. Repeating a prefix has no effect.
    pub fn reserve(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !self
            .prefixes
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&prefix))
        {
            self.prefixes.push(prefix);
        }
        self
    }

    /// Sets the prefix used when stamping outgoing requests. Defaults to the
    /// first reserved prefix.
    pub fn egress_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.egress_prefix = Some(prefix.into());
        self
    }

    /// Sets the shared MAC key.
    pub fn signing_key(mut self, key: SigningKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the maximum assertion age.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.window.max_age = max_age;
        self
    }

    /// Sets the allowance for timestamps ahead of the local clock.
    pub fn max_skew(mut self, max_skew: Duration) -> Self {
        self.window.max_skew = max_skew;
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no key is set, the key is shorter than
    ///   [`MIN_KEY_LEN`] bytes, no prefix is reserved, or the egress prefix is
    ///   not reserved.
    /// - [`Error::InvalidPrefix`] / [`Error::AmbiguousPrefix`] for bad
    ///   prefixes.
    pub fn build(self) -> Result<TrustConfig> {
        let key = self
            .key
            .ok_or_else(|| Error::Config("signing key is required".to_string()))?;
        if key.len() < MIN_KEY_LEN {
            return Err(Error::Config(format!(
                "signing key must be at least {} bytes, got {}",
                MIN_KEY_LEN,
                key.len()
            )));
        }

        let mut reserved = ReservedPrefixes::new();
        for raw in &self.prefixes {
            reserved.insert(Prefix::parse(raw)?)?;
        }

        let egress_prefix = match self.egress_prefix {
            Some(raw) => Prefix::parse(&raw)?,
            None => reserved
                .iter()
                .next()
                .cloned()
                .ok_or_else(|| Error::Config("at least one prefix must be reserved".to_string()))?,
        };
        if !reserved.contains(&egress_prefix) {
            return Err(Error::Config(format!(
                "egress prefix '{}' is not reserved",
                egress_prefix
            )));
        }

        tracing::debug!(
            prefixes = ?reserved.iter().map(Prefix::as_str).collect::<Vec<_>>(),
            egress_prefix = %egress_prefix,
            max_age_ms = self.window.max_age.as_millis() as u64,
            max_skew_ms = self.window.max_skew.as_millis() as u64,
            "trust configuration loaded"
        );

        Ok(TrustConfig {
            reserved,
            egress_prefix,
            key,
            window: self.window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn key() -> SigningKey {
        SigningKey::new(vec![3u8; 32])
    }

    #[test]
    fn builds_with_defaults() {
        let config = TrustConfig::builder()
            .reserve("int")
            .signing_key(key())
            .build()
            .unwrap();

        assert_eq!(config.egress_prefix().as_str(), "int");
        assert_eq!(config.window(), FreshnessWindow::default());
    }

    #[test]
    fn reserve_deduplicates_case_insensitively() {
        let config = TrustConfig::builder()
            .reserve("int")
            .reserve("INT")
            .signing_key(key())
            .build()
            .unwrap();
        assert_eq!(config.reserved().len(), 1);
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = TrustConfig::builder().reserve("int").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn short_key_is_an_error() {
        let err = TrustConfig::builder()
            .reserve("int")
            .signing_key(SigningKey::new(vec![1u8; 16]))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
    }

    #[test]
    fn empty_prefix_set_is_an_error() {
        let err = TrustConfig::builder().signing_key(key()).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn ambiguous_prefixes_are_an_error() {
        let err = TrustConfig::builder()
            .reserve("int")
            .reserve("int-edge")
            .signing_key(key())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousPrefix { .. }));
    }

    #[test]
    fn egress_prefix_must_be_reserved() {
        let err = TrustConfig::builder()
            .reserve("int")
            .egress_prefix("svc")
            .signing_key(key())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("not reserved"));
    }

    #[test]
    fn debug_output_hides_key() {
        let config = TrustConfig::builder()
            .reserve("int")
            .signing_key(SigningKey::new(b"super-secret-signing-key-material".to_vec()))
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    fn lookup<'a>(vars: &'a HashMap<&'a str, String>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let vars = HashMap::from([
            (ENV_SECRET, "aa".repeat(32)),
            (ENV_PREFIXES, "edge, svc,".to_string()),
            (ENV_EGRESS_PREFIX, "svc".to_string()),
            (ENV_MAX_AGE_SECS, "60".to_string()),
            (ENV_MAX_SKEW_SECS, "5".to_string()),
        ]);

        let config = TrustConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.reserved().len(), 2);
        assert_eq!(config.egress_prefix().as_str(), "svc");
        assert_eq!(config.window().max_age, Duration::from_secs(60));
        assert_eq!(config.window().max_skew, Duration::from_secs(5));
    }

    #[test]
    fn from_lookup_requires_secret_and_prefixes() {
        let no_secret = HashMap::from([(ENV_PREFIXES, "int".to_string())]);
        assert!(TrustConfig::from_lookup(lookup(&no_secret))
            .unwrap_err()
            .to_string()
            .contains(ENV_SECRET));

        let no_prefixes = HashMap::from([(ENV_SECRET, "aa".repeat(32))]);
        assert!(TrustConfig::from_lookup(lookup(&no_prefixes))
            .unwrap_err()
            .to_string()
            .contains(ENV_PREFIXES));
    }

    #[test]
    fn from_lookup_rejects_bad_durations() {
        let vars = HashMap::from([
            (ENV_SECRET, "aa".repeat(32)),
            (ENV_PREFIXES, "int".to_string()),
            (ENV_MAX_AGE_SECS, "five minutes".to_string()),
        ]);
        assert!(TrustConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrustConfig>();
    }
}
