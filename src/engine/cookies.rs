// src/engine/cookies.rs
//! Cookies: [`CookieJar`], [`CookieStore`] and backends.
//!
//! The consent record is kept in a cookie. The host's cookie facility is
//! modeled by the [`CookieJar`] trait so the widget can run against an
//! in-memory jar ([`DefaultCookieJar`]), a jar persisted to disk
//! ([`PersistentCookieJar`] over a [`JsonCookieStore`] or
//! [`SqliteCookieStore`]), or a host-provided implementation.

mod cookies;
mod cookie_jar;
mod store;
mod persistent_cookie_jar;

pub use cookies::Cookie;
pub use cookies::CookieJarHandle;
pub use cookies::CookieStoreHandle;
pub use cookies::domain_matches;

pub use cookie_jar::CookieJar;
pub use cookie_jar::DefaultCookieJar;
pub use persistent_cookie_jar::PersistentCookieJar;

pub use store::CookieStore;
pub use store::JsonCookieStore;
#[cfg(feature = "sqlite_cookie_store")]
pub use store::SqliteCookieStore;
