//! Header collection abstraction.
//!
//! The guard, writer and reader only need four primitive operations on a
//! multi-valued header collection. [`HeaderStore`] captures them so that any
//! framework's header type can be plugged in; [`http::HeaderMap`] is
//! supported out of the box.

use http::header::{Entry, HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// A mutable, multi-valued, case-insensitive header collection.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use trust_headers::HeaderStore;
///
/// let mut headers = HeaderMap::new();
/// headers.set("int-user", "u1").unwrap();
/// assert_eq!(headers.header_values("INT-USER"), vec![b"u1".as_slice()]);
///
/// assert_eq!(headers.remove_all("int-user"), 1);
/// assert!(headers.header_names().is_empty());
/// ```
pub trait HeaderStore {
    /// Every distinct header name currently present.
    fn header_names(&self) -> Vec<String>;

    /// All raw values stored under `name`, in insertion order.
    fn header_values(&self, name: &str) -> Vec<&[u8]>;

    /// Replaces every value under `name` with the single `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] when the name or value cannot be
    /// represented by the collection.
    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    /// Removes every value under `name`, returning how many were removed.
    fn remove_all(&mut self, name: &str) -> usize;
}

impl HeaderStore for HeaderMap {
    fn header_names(&self) -> Vec<String> {
        self.keys().map(|name| name.as_str().to_string()).collect()
    }

    fn header_values(&self, name: &str) -> Vec<&[u8]> {
        self.get_all(name).iter().map(HeaderValue::as_bytes).collect()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader {
            name: name.to_string(),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader {
            name: name.to_string(),
        })?;

        self.insert(header_name, header_value);
        Ok(())
    }

    fn remove_all(&mut self, name: &str) -> usize {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            return 0;
        };

        match self.entry(header_name) {
            Entry::Occupied(entry) => entry.remove_entry_mult().1.count(),
            Entry::Vacant(_) => 0,
        }
    }
}
