use crate::assertion::Assertion;
use crate::schema::{Field, Prefix};
use crate::store::HeaderStore;

/// Writes an assertion onto a header collection under `prefix`.
///
/// Each of the five slots is replaced, never appended to, so writing the
/// same assertion twice leaves the collection unchanged and a later write
/// always wins over an earlier one.
///
/// Sign before writing: the assertion's signature is written verbatim.
///
/// # Panics
///
/// Panics if the header store refuses a field. An [`Assertion`] only holds
/// header-safe values, so this signals a broken [`HeaderStore`]
/// implementation rather than bad input.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use trust_headers::{write, Assertion, Prefix};
///
/// let mut headers = HeaderMap::new();
/// let assertion = Assertion::new("u1", "GET", "/x", 1000, "abc").unwrap();
/// write(&mut headers, &assertion, &Prefix::parse("int").unwrap());
///
/// assert_eq!(headers["int-user"], "u1");
/// assert_eq!(headers["int-ts"], "1000");
/// ```
pub fn write<H>(headers: &mut H, assertion: &Assertion, prefix: &Prefix)
where
    H: HeaderStore + ?Sized,
{
    for field in Field::ALL {
        let name = prefix.header_name(field);
        let value = assertion.field_value(field);

        if let Err(err) = headers.set(&name, &value) {
            panic!("header store refused assertion field '{}': {}", name, err);
        }
    }

    tracing::trace!(prefix = %prefix, user_id = %assertion.user_id(), "assertion written");
}
