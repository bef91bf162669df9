//! Cookie core types.
//!
//! This module defines the **type-erased handles** used by the consent store
//! and the serializable [`Cookie`] data structure.
//!
//! # Concurrency model
//! - [`CookieJarHandle`] is `Arc<RwLock<dyn CookieJar + Send + Sync>>`.
//!   Callers take a **read lock** for lookups and a **write lock** for
//!   mutations of the underlying jar.
//! - [`CookieStoreHandle`] is `Arc<dyn CookieStore + Send + Sync>`. Stores
//!   manage their own synchronization; the trait methods take `&self`.
//!
//! ```rust
//! use cookie_consent::cookies::Cookie;
//!
//! let c = Cookie::session("consent", r#"["necessary"]"#, "example.com");
//! assert_eq!(c.to_cookie_string(), r#"consent=["necessary"]; Domain=example.com;"#);
//! ```

use crate::engine::cookies::store::CookieStore;
use crate::engine::cookies::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// A handle to a cookie jar trait.
///
/// Reference-counted, read/write-locked pointer to a type-erased [`CookieJar`].
pub type CookieJarHandle = Arc<RwLock<dyn CookieJar + Send + Sync>>;

/// A handle to a cookie store trait.
///
/// Store implementations must be internally synchronized, since callers hold
/// only `&self` when invoking trait methods.
pub type CookieStoreHandle = Arc<dyn CookieStore + Send + Sync>;

/// A cookie as stored/serialized by the widget.
///
/// The consent record is a session cookie, so only the scoping attribute is
/// modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded).
    pub value: String,

    /// Domain scoping. A cookie for `example.com` is visible to `example.com`
    /// and all of its subdomains. `None` means host-only.
    pub domain: Option<String>,
}

impl Cookie {
    /// Creates a session cookie (no expiry) scoped to `domain`.
    pub fn session(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: Some(domain.into()),
        }
    }

    /// Renders the assignment string a page writes to its cookie facility
    /// (`name=value; Domain=...;`).
    pub fn to_cookie_string(&self) -> String {
        let mut out = format!("{}={};", self.name, self.value);
        if let Some(domain) = &self.domain {
            out.push_str(&format!(" Domain={};", domain));
        }
        out
    }
}

/// Domain matching: `host` equals `domain` or is a subdomain of it (ASCII case-insensitive).
pub fn domain_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').trim_end_matches('.').to_ascii_lowercase();

    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_matching_covers_subdomains_only() {
        assert!(domain_matches("example.com", "example.com"));
        assert!(domain_matches("a.b.example.com", "example.com"));
        assert!(domain_matches("WWW.Example.COM", ".example.com"));
        assert!(!domain_matches("badexample.com", "example.com"));
        assert!(!domain_matches("example.com", "www.example.com"));
        assert!(domain_matches("localhost", "localhost"));
    }

    #[test]
    fn cookie_string_carries_domain_only_when_scoped() {
        let mut c = Cookie::session("consent", "[]", "example.com");
        assert_eq!(c.to_cookie_string(), "consent=[]; Domain=example.com;");

        c.domain = None;
        assert_eq!(c.to_cookie_string(), "consent=[];");
    }
}
