//! Core data types for the cache layer.
//!
//! A [`Manifest`] names the resources precached at install time, a
//! [`CacheKey`] identifies one stored entry, and a [`StoredResponse`] is the
//! materialized response bytes kept in a partition.

use serde::{Deserialize, Serialize};

/// The fixed, ordered list of resource identifiers to precache for one
/// generation. Identifiers may be relative paths or absolute URLs; the list
/// is supplied by the deployer at build time and never changes once an
/// install begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    resources: Vec<String>,
}

impl Manifest {
    pub fn new(resources: Vec<String>) -> Self {
        Self { resources }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<String> for Manifest {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Manifest {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}

/// Normalized request identifier: uppercased method plus the URL with any
/// fragment stripped. Fragments never reach the network, so two URLs that
/// differ only in fragment must map to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(method: &str, url: &str) -> Self {
        let url = match url.find('#') {
            Some(pos) => &url[..pos],
            None => url,
        };
        Self(format!("{} {}", method.to_ascii_uppercase(), url))
    }

    /// Key for a plain GET, the only method precached at install time.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A materialized response held in a cache partition: status line, headers,
/// and body bytes. Entries are written once at install time and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StoredResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A 200 response with no headers, convenient for fakes and fixtures.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, Vec::new(), body.into())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
