//! Header naming for trust assertions.
//!
//! An assertion under prefix `int` occupies exactly five headers:
//! `int-user`, `int-ts`, `int-sig`, `int-method` and `int-path`.
//! Names are built by exact string construction, so reading one prefix can
//! never pick up another prefix's slots.

use std::fmt;

use crate::error::{Error, Result};

/// One of the five slots of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Authenticated principal identifier
    User,
    /// Mint time in milliseconds since the Unix epoch
    Timestamp,
    /// MAC over the other four fields
    Signature,
    /// HTTP method being authorized
    Method,
    /// Request path being authorized
    Path,
}

impl Field {
    /// All five fields, in header-slot order.
    pub const ALL: [Field; 5] = [
        Field::User,
        Field::Timestamp,
        Field::Signature,
        Field::Method,
        Field::Path,
    ];

    /// Header-name suffix for this field.
    pub fn suffix(self) -> &'static str {
        match self {
            Field::User => "user",
            Field::Timestamp => "ts",
            Field::Signature => "sig",
            Field::Method => "method",
            Field::Path => "path",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A namespace token scoping five assertion headers to one trust tier.
///
/// Prefixes are case-insensitive and stored lowercase. Only ASCII letters,
/// digits, `_`, `.` and interior `-` are accepted, which keeps every slot
/// name a valid HTTP header name.
///
/// # Examples
///
/// ```
/// use trust_headers::{Field, Prefix};
///
/// let prefix = Prefix::parse("Edge").unwrap();
/// assert_eq!(prefix.as_str(), "edge");
/// assert_eq!(prefix.header_name(Field::Timestamp), "edge-ts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Validates and normalizes a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrefix`] when the token is empty, contains a
    /// character outside the accepted set, or starts or ends with `-`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidPrefix {
            prefix: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("is empty"));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(invalid("must not start or end with '-'"));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        {
            return Err(invalid("contains characters not allowed in a header name"));
        }

        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Returns the normalized prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the header name for one field: `{prefix}-{suffix}`.
    pub fn header_name(&self, field: Field) -> String {
        format!("{}-{}", self.0, field.suffix())
    }

    /// Returns the five header names in [`Field::ALL`] order.
    pub fn slots(&self) -> [String; 5] {
        Field::ALL.map(|field| self.header_name(field))
    }

    /// Whether `name` falls in this prefix's namespace, i.e. starts with
    /// `{prefix}-` ignoring ASCII case.
    pub fn covers(&self, name: &str) -> bool {
        let prefix = self.0.as_bytes();
        let name = name.as_bytes();

        name.len() > prefix.len()
            && name[..prefix.len()].eq_ignore_ascii_case(prefix)
            && name[prefix.len()] == b'-'
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Prefix::parse(s)
    }
}

/// The closed set of prefixes whose headers are internal.
///
/// Any inbound header under one of these prefixes is stripped by the
/// injection guard. The set is built once at startup and not changed
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedPrefixes {
    prefixes: Vec<Prefix>,
}

impl ReservedPrefixes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prefix, ignoring exact duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousPrefix`] when the new prefix is nested
    /// under an existing member (or the other way around), e.g. `int` and
    /// `int-svc`.
    pub fn insert(&mut self, prefix: Prefix) -> Result<()> {
        for existing in &self.prefixes {
            if *existing == prefix {
                return Ok(());
            }
            if existing.covers(prefix.as_str()) || prefix.covers(existing.as_str()) {
                return Err(Error::AmbiguousPrefix {
                    first: existing.to_string(),
                    second: prefix.to_string(),
                });
            }
        }

        self.prefixes.push(prefix);
        Ok(())
    }

    /// Whether `prefix` is a member of the set.
    pub fn contains(&self, prefix: &Prefix) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Whether a header name is internal under any reserved prefix.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| prefix.covers(name))
    }

    /// Iterates over members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }

    /// Number of reserved prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether no prefix is reserved.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl TryFrom<&[&str]> for ReservedPrefixes {
    type Error = Error;

    fn try_from(raw: &[&str]) -> Result<Self> {
        let mut set = ReservedPrefixes::new();
        for prefix in raw {
            set.insert(Prefix::parse(prefix)?)?;
        }
        Ok(set)
    }
}
