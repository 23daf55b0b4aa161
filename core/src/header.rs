//! Header names understood by the connection.
//!
//! # Design
//! A closed set of well-known names plus an open `Custom` variant. Equality,
//! ordering and hashing go through the wire name with ASCII case folded, so
//! `HeaderName::Custom("content-type".into())` and `HeaderName::ContentType`
//! are the same key in a `CustomHeaders` map. Parsing a string also folds
//! well-known names onto their variants.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Custom headers applied to every request built by a connection.
///
/// A `BTreeMap` so iteration order (by case-folded wire name) is stable from
/// one request to the next.
pub type CustomHeaders = BTreeMap<HeaderName, String>;

/// An HTTP header name.
#[derive(Debug, Clone)]
pub enum HeaderName {
    ContentType,
    Accept,
    Authorization,
    UserAgent,
    CacheControl,
    Custom(String),
}

impl HeaderName {
    /// Canonical wire-format name.
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::ContentType => "Content-Type",
            HeaderName::Accept => "Accept",
            HeaderName::Authorization => "Authorization",
            HeaderName::UserAgent => "User-Agent",
            HeaderName::CacheControl => "Cache-Control",
            HeaderName::Custom(name) => name,
        }
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_str().bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for HeaderName {}

impl PartialOrd for HeaderName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeaderName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HeaderName {
    fn from(name: &str) -> Self {
        const KNOWN: [HeaderName; 5] = [
            HeaderName::ContentType,
            HeaderName::Accept,
            HeaderName::Authorization,
            HeaderName::UserAgent,
            HeaderName::CacheControl,
        ];
        KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| HeaderName::Custom(name.to_string()))
    }
}

impl From<String> for HeaderName {
    fn from(name: String) -> Self {
        HeaderName::from(name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_names_have_canonical_wire_form() {
        assert_eq!(HeaderName::ContentType.as_str(), "Content-Type");
        assert_eq!(HeaderName::Accept.as_str(), "Accept");
        assert_eq!(HeaderName::Authorization.as_str(), "Authorization");
        assert_eq!(HeaderName::UserAgent.as_str(), "User-Agent");
        assert_eq!(HeaderName::CacheControl.as_str(), "Cache-Control");
    }

    #[test]
    fn custom_name_is_passed_through_verbatim() {
        let name = HeaderName::Custom("X-Request-Id".to_string());
        assert_eq!(name.as_str(), "X-Request-Id");
        assert_eq!(name.to_string(), "X-Request-Id");
    }

    #[test]
    fn parsing_folds_well_known_names_case_insensitively() {
        assert_eq!(HeaderName::from("content-type"), HeaderName::ContentType);
        assert_eq!(HeaderName::from("CACHE-CONTROL"), HeaderName::CacheControl);
        assert_eq!(
            HeaderName::from("x-token"),
            HeaderName::Custom("x-token".to_string())
        );
    }

    #[test]
    fn custom_headers_iterate_in_stable_order() {
        let mut headers = CustomHeaders::new();
        headers.insert(HeaderName::from("X-B"), "2".to_string());
        headers.insert(HeaderName::UserAgent, "agent".to_string());
        headers.insert(HeaderName::from("X-A"), "1".to_string());

        let names: Vec<&str> = headers.keys().map(HeaderName::as_str).collect();
        assert_eq!(names, vec!["User-Agent", "X-A", "X-B"]);
    }

    #[test]
    fn custom_spelling_of_well_known_name_is_the_same_key() {
        assert_eq!(HeaderName::Custom("Content-Type".to_string()), HeaderName::ContentType);
        assert_eq!(HeaderName::Custom("x-token".to_string()), HeaderName::Custom("X-Token".to_string()));
        assert_ne!(HeaderName::Custom("X-Token".to_string()), HeaderName::Authorization);

        let mut headers = CustomHeaders::new();
        headers.insert(HeaderName::ContentType, "application/json".to_string());
        headers.insert(HeaderName::Custom("content-type".to_string()), "text/plain".to_string());
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(&HeaderName::ContentType).map(String::as_str), Some("text/plain"));
    }

    #[test]
    fn case_folded_names_hash_alike() {
        use std::collections::HashSet;

        let set: HashSet<HeaderName> = [
            HeaderName::CacheControl,
            HeaderName::Custom("cache-control".to_string()),
            HeaderName::Custom("CACHE-CONTROL".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }
}
