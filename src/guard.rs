//! Injection guard for reserved header namespaces.
//!
//! Every inbound request must pass through [`strip`] before any trusted
//! component writes its own assertion. Otherwise an external caller could
//! pre-seed headers that a later conditional write, or a write under a
//! different prefix, fails to overwrite.

use crate::audit;
use crate::schema::ReservedPrefixes;
use crate::store::HeaderStore;

/// Removes every header under any reserved prefix.
///
/// Matching is case-insensitive on `{prefix}-`. Names are collected first
/// and removed afterwards, and every value of a matching name is removed, so
/// duplicated headers cannot leave a residue. Returns the number of distinct
/// header names removed. Finding nothing to strip is the normal case.
///
/// # Examples
///
/// ```
/// use http::{HeaderMap, HeaderValue};
/// use trust_headers::{strip, ReservedPrefixes};
///
/// let reserved = ReservedPrefixes::try_from(&["int"][..]).unwrap();
/// let mut headers = HeaderMap::new();
/// headers.append("int-user", HeaderValue::from_static("admin"));
/// headers.append("INT-USER", HeaderValue::from_static("root"));
/// headers.insert("accept", HeaderValue::from_static("*/*"));
///
/// assert_eq!(strip(&mut headers, &reserved), 1);
/// assert!(headers.get("int-user").is_none());
/// assert_eq!(headers.len(), 1);
/// ```
pub fn strip<H>(headers: &mut H, reserved: &ReservedPrefixes) -> usize
where
    H: HeaderStore + ?Sized,
{
    // Collect before removing: some collections cannot be mutated while a
    // name iteration is live.
    let doomed: Vec<String> = headers
        .header_names()
        .into_iter()
        .filter(|name| reserved.is_reserved(name))
        .collect();

    if doomed.is_empty() {
        return 0;
    }

    let values: usize = doomed.iter().map(|name| headers.remove_all(name)).sum();
    audit::headers_stripped(&doomed, values);

    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    fn reserved() -> ReservedPrefixes {
        ReservedPrefixes::try_from(&["int", "svc"][..]).unwrap()
    }

    #[test]
    fn strips_forged_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("int-user", HeaderValue::from_static("admin"));
        headers.insert("int-sig", HeaderValue::from_static("forged"));

        assert_eq!(strip(&mut headers, &reserved()), 2);
        assert!(headers.is_empty());
    }

    #[test]
    fn strips_every_reserved_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("int-user", HeaderValue::from_static("a"));
        headers.insert("svc-path", HeaderValue::from_static("/b"));

        strip(&mut headers, &reserved());
        assert!(headers.is_empty());
    }

    #[test]
    fn strips_unknown_slots_in_reserved_namespace() {
        let mut headers = HeaderMap::new();
        headers.insert("int-role", HeaderValue::from_static("admin"));
        headers.insert("svc-", HeaderValue::from_static("x"));

        assert_eq!(strip(&mut headers, &reserved()), 2);
    }

    #[test]
    fn removes_all_duplicate_values() {
        let mut headers = HeaderMap::new();
        headers.append("int-user", HeaderValue::from_static("u1"));
        headers.append("int-user", HeaderValue::from_static("attacker"));

        strip(&mut headers, &reserved());
        assert_eq!(headers.get_all("int-user").iter().count(), 0);
    }

    #[test]
    fn keeps_unreserved_headers_intact() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));
        headers.insert("internal-user", HeaderValue::from_static("not ours"));
        headers.insert("int", HeaderValue::from_static("bare"));
        let before = headers.clone();

        headers.insert("int-user", HeaderValue::from_static("admin"));
        strip(&mut headers, &reserved());

        assert_eq!(headers, before);
    }

    #[test]
    fn nothing_to_strip_is_silent() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        assert_eq!(strip(&mut headers, &reserved()), 0);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn strip_is_idempotent() {
        let mut headers = HeaderMap::new();
        headers.insert("int-user", HeaderValue::from_static("admin"));
        headers.insert("accept", HeaderValue::from_static("*/*"));

        strip(&mut headers, &reserved());
        let once = headers.clone();
        assert_eq!(strip(&mut headers, &reserved()), 0);
        assert_eq!(headers, once);
    }
}
