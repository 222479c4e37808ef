use crate::assertion::{is_header_safe, Assertion};
use crate::schema::{Field, Prefix};
use crate::store::HeaderStore;

/// Reads the assertion stored under `prefix`, if a complete one is present.
///
/// Returns `None` when any of the five headers is missing, empty, repeated,
/// or not plain text, and when the timestamp is not a base-10 integer.
/// A partial assertion is never returned. The header collection is not
/// modified.
///
/// The result is only *parsed*, not trusted: hand it to
/// [`Verifier`](crate::Verifier) before relying on the identity.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use trust_headers::{read, write, Assertion, Prefix};
///
/// let prefix = Prefix::parse("int").unwrap();
/// let mut headers = HeaderMap::new();
/// assert!(read(&headers, &prefix).is_none());
///
/// let assertion = Assertion::new("u1", "GET", "/x", 1000, "abc").unwrap();
/// write(&mut headers, &assertion, &prefix);
/// assert_eq!(read(&headers, &prefix), Some(assertion));
/// ```
pub fn read<H>(headers: &H, prefix: &Prefix) -> Option<Assertion>
where
    H: HeaderStore + ?Sized,
{
    let [user, ts, sig, method, path] =
        Field::ALL.map(|field| sole_value(headers, &prefix.header_name(field)));

    let timestamp = parse_timestamp(ts?)?;

    // Only fails on empty values; sole_value already filtered the rest.
    Assertion::new(user?, method?, path?, timestamp, sig?).ok()
}

/// The single text value under `name`, or `None` if there is not exactly one.
fn sole_value<'a, H>(headers: &'a H, name: &str) -> Option<&'a str>
where
    H: HeaderStore + ?Sized,
{
    let values = headers.header_values(name);
    if values.len() != 1 {
        if values.len() > 1 {
            tracing::debug!(header = %name, count = values.len(), "repeated assertion header");
        }
        return None;
    }

    let value = std::str::from_utf8(values[0]).ok()?;
    is_header_safe(value).then_some(value)
}

/// Digits only: no sign, no whitespace, no fraction.
fn parse_timestamp(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
