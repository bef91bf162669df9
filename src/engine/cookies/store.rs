//! Cookie store infrastructure.
//!
//! A **cookie store** is the persistence layer behind a [`PersistentCookieJar`]:
//! it loads the jar once when the widget starts and receives a full snapshot
//! after every mutation.
//!
//! This module exports two reference implementations:
//! - [`JsonCookieStore`]: file-backed JSON store (good for simple setups).
//! - [`SqliteCookieStore`]: SQLite-backed store (feature `sqlite_cookie_store`).
//!
//! ## Example
//! ```rust,no_run
//! use cookie_consent::cookies::{JsonCookieStore, PersistentCookieJar};
//!
//! let store = JsonCookieStore::new("cookies.json".into());
//! let jar = PersistentCookieJar::open(store).expect("cookie store cannot be loaded");
//! ```
//!
//! [`PersistentCookieJar`]: crate::cookies::PersistentCookieJar
mod json;
#[cfg(feature = "sqlite_cookie_store")]
mod sqlite;

use anyhow::Result;

use crate::engine::cookies::cookie_jar::DefaultCookieJar;

/// File-backed JSON cookie store.
pub use json::JsonCookieStore;
/// SQLite-backed cookie store.
#[cfg(feature = "sqlite_cookie_store")]
pub use sqlite::SqliteCookieStore;

/// A cookie **store** loads and persists the state of one cookie jar.
///
/// Implementations must be `Send + Sync` and safe for concurrent use.
pub trait CookieStore: Send + Sync {
    /// Loads the persisted jar. A store without data returns an empty jar.
    ///
    /// Malformed data is treated as absent, so a corrupted file never blocks
    /// the widget. I/O failures are returned as errors.
    fn load(&self) -> Result<DefaultCookieJar>;

    /// Replaces the persisted state with `snapshot`.
    ///
    /// The write must be all-or-nothing: a failure leaves the previous state intact.
    fn persist_snapshot(&self, snapshot: &DefaultCookieJar) -> Result<()>;
}
