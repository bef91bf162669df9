//! Persisted consent.
//!
//! The visitor's decision is kept in a single cookie (default name
//! `consent`) whose value is a JSON array of category ids. The cookie is
//! written with `Domain=<registrable domain>` and without expiry, so every
//! subdomain of the site shares one decision for the lifetime of the
//! browsing session.
//!
//! The presence of a well-formed cookie is the "already decided" signal: an
//! empty array counts as a decision, a missing or malformed value does not.

use std::sync::PoisonError;

use crate::engine::categories::CategoryId;
use crate::engine::cookies::{Cookie, CookieJar, CookieJarHandle};

/// Number of rightmost hostname labels forming the storage scope.
const SCOPE_LABELS: usize = 2;

/// Returns the scope the consent cookie is written to: the rightmost two labels
/// of `host`, or `host` itself when it has fewer labels.
///
/// ```rust
/// use cookie_consent::consent_store::registrable_domain;
///
/// assert_eq!(registrable_domain("a.b.example.com"), "example.com");
/// assert_eq!(registrable_domain("example.com"), "example.com");
/// assert_eq!(registrable_domain("localhost"), "localhost");
/// ```
pub fn registrable_domain(host: &str) -> String {
    // A fully qualified host ends with an empty root label.
    let host = host.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > SCOPE_LABELS {
        labels[labels.len() - SCOPE_LABELS..].join(".")
    } else {
        host.to_string()
    }
}

/// Reads and writes the visitor's consent record.
///
/// Only the widget writes through this store; the dialogs receive a shared
/// reference for reading.
pub struct ConsentStore {
    key: String,
    host: String,
    scope: String,
    /// Returned by [`read_categories`](Self::read_categories) while no decision exists
    necessary: Vec<CategoryId>,
    jar: CookieJarHandle,
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("key", &self.key)
            .field("host", &self.host)
            .field("scope", &self.scope)
            .field("necessary", &self.necessary)
            .finish_non_exhaustive()
    }
}

impl ConsentStore {
    pub fn new(
        key: impl Into<String>,
        host: impl Into<String>,
        necessary: Vec<CategoryId>,
        jar: CookieJarHandle,
    ) -> Self {
        let host = host.into();
        Self {
            key: key.into(),
            scope: registrable_domain(&host),
            host,
            necessary,
            jar,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Domain the consent cookie is written to.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn jar(&self) -> &CookieJarHandle {
        &self.jar
    }

    fn raw_value(&self) -> Option<String> {
        let jar = self.jar.read().unwrap_or_else(PoisonError::into_inner);
        jar.get_cookie(&self.host, &self.key).map(|c| c.value)
    }

    /// Parses the stored record. `None` when the cookie is missing or malformed.
    pub fn stored_categories(&self) -> Option<Vec<CategoryId>> {
        let raw = self.raw_value()?;
        match serde_json::from_str::<Vec<CategoryId>>(&raw) {
            Ok(categories) => Some(categories),
            Err(e) => {
                log::warn!("ignoring malformed consent cookie {:?}: {}", self.key, e);
                None
            }
        }
    }

    /// `true` if the visitor already made a decision.
    pub fn has_prior_consent(&self) -> bool {
        self.stored_categories().is_some()
    }

    /// `true` if no decision exists yet (the consent prompt may be shown).
    pub fn no_consent(&self) -> bool {
        !self.has_prior_consent()
    }

    /// The categories the visitor allowed, or the always-enabled categories
    /// when no decision exists.
    pub fn read_categories(&self) -> Vec<CategoryId> {
        self.stored_categories().unwrap_or_else(|| self.necessary.clone())
    }

    /// Persists `categories` as the visitor's decision.
    ///
    /// Failures of the underlying jar are logged; the widget keeps running.
    pub fn write_categories(&mut self, categories: &[CategoryId]) {
        let value = match serde_json::to_string(categories) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("cannot serialize consent record: {}", e);
                return;
            }
        };

        let cookie = Cookie::session(self.key.clone(), value, self.scope.clone());
        let mut jar = self.jar.write().unwrap_or_else(PoisonError::into_inner);
        match jar.set_cookie(&self.host, cookie) {
            Ok(()) => log::debug!("stored consent {:?} for {}", categories, self.scope),
            Err(e) => log::warn!("cannot persist consent cookie {:?}: {:#}", self.key, e),
        }
    }

    /// Persists an untyped payload. Only a JSON array of strings is accepted;
    /// anything else is dropped without touching the stored record.
    pub fn write_raw(&mut self, payload: &serde_json::Value) {
        let Some(items) = payload.as_array() else {
            log::debug!("dropping consent payload that is not an array: {}", payload);
            return;
        };

        let categories: Option<Vec<CategoryId>> = items
            .iter()
            .map(|item| item.as_str().map(CategoryId::from))
            .collect();

        match categories {
            Some(categories) => self.write_categories(&categories),
            None => log::debug!("dropping consent payload with non-string entries: {}", payload),
        }
    }

    /// The assignment string a page would write for the current record.
    pub fn cookie_string(&self) -> Option<String> {
        let jar = self.jar.read().unwrap_or_else(PoisonError::into_inner);
        jar.get_cookie(&self.host, &self.key).map(|c| c.to_cookie_string())
    }
}
