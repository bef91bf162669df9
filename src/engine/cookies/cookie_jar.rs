//! Cookie jar abstraction and a simple in-memory implementation.
//!
//! A **cookie jar** holds the cookies visible to the page hosting the
//! widget. The consent store reads and writes exactly one cookie through it.
//!
//! [`DefaultCookieJar`] stores cookies **in memory only** and buckets them by
//! their `Domain` attribute (host-only cookies are bucketed by the host they
//! were set from). A lookup for a host considers every bucket whose domain
//! matches the host, so a cookie written with `Domain=example.com` is seen
//! from `www.example.com` and from `example.com` alike.
//!
//! This module is **not** internally synchronized. Use it via a
//! `CookieJarHandle = Arc<RwLock<dyn CookieJar + Send + Sync>>`.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::cookies::{domain_matches, Cookie, CookieJarHandle};

/// A cookie jar keeps the cookies visible to the page hosting the widget.
pub trait CookieJar: Send + Sync {
    /// Returns the cookie called `name` visible from `host`, if any.
    ///
    /// When several domains carry a cookie with the same name, the most
    /// specific (longest) domain wins.
    fn get_cookie(&self, host: &str, name: &str) -> Option<Cookie>;

    /// Stores `cookie`, replacing a cookie with the same name and domain.
    fn set_cookie(&mut self, host: &str, cookie: Cookie) -> Result<()>;
}

/// In-memory cookie jar, bucketed by cookie domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultCookieJar {
    /// Key: cookie domain (or the setting host for host-only cookies).
    pub entries: HashMap<String, Vec<Cookie>>,
}

impl DefaultCookieJar {
    /// Creates an empty in-memory cookie jar.
    pub fn new() -> Self {
        DefaultCookieJar {
            entries: HashMap::new(),
        }
    }

    /// Wraps the jar into a shareable [`CookieJarHandle`].
    pub fn into_handle(self) -> CookieJarHandle {
        Arc::new(RwLock::new(self))
    }

    fn bucket_key(host: &str, cookie: &Cookie) -> String {
        cookie
            .domain
            .as_deref()
            .unwrap_or(host)
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }

    fn visible_from<'a>(&'a self, host: &'a str) -> impl Iterator<Item = (&'a String, &'a Vec<Cookie>)> + 'a {
        self.entries
            .iter()
            .filter(move |(domain, _)| domain_matches(host, domain))
    }
}

impl CookieJar for DefaultCookieJar {
    fn get_cookie(&self, host: &str, name: &str) -> Option<Cookie> {
        self.visible_from(host)
            .filter_map(|(domain, cookies)| {
                cookies.iter().find(|c| c.name == name).map(|c| (domain.len(), c))
            })
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, c)| c.clone())
    }

    fn set_cookie(&mut self, host: &str, cookie: Cookie) -> Result<()> {
        let bucket = self.entries.entry(Self::bucket_key(host, &cookie)).or_default();

        // Replace existing cookie with same name
        if let Some(existing) = bucket.iter_mut().find(|c| c.name == cookie.name) {
            *existing = cookie;
        } else {
            bucket.push(cookie);
        }
        Ok(())
    }
}
