use std::sync::{Arc, RwLock};

use anyhow::Result;

use crate::engine::cookies::cookie_jar::DefaultCookieJar;
use crate::engine::cookies::{Cookie, CookieJar, CookieJarHandle, CookieStoreHandle};

/// A `CookieJar` decorator that persists changes after each mutation.
///
/// This type is *transparent* for reads but *eagerly* persists after writes.
/// The in-memory state is updated first; a failing persist is reported to the
/// caller and the next successful mutation writes the full state again.
pub struct PersistentCookieJar {
    /// Inner cookie jar that holds the actual cookie state.
    inner: DefaultCookieJar,
    /// Handle to the cookie store responsible for persistence.
    store_handle: CookieStoreHandle,
}

impl PersistentCookieJar {
    /// Creates a new persistence-enabled wrapper around an existing jar.
    pub fn new(jar: DefaultCookieJar, store_handle: CookieStoreHandle) -> Self {
        Self {
            inner: jar,
            store_handle,
        }
    }

    /// Loads the jar from `store` and returns a handle that persists back into it.
    pub fn open(store: CookieStoreHandle) -> Result<CookieJarHandle> {
        let jar = store.load()?;
        Ok(Arc::new(RwLock::new(Self::new(jar, store))))
    }

    fn persist(&self) -> Result<()> {
        self.store_handle.persist_snapshot(&self.inner)
    }
}

impl CookieJar for PersistentCookieJar {
    fn get_cookie(&self, host: &str, name: &str) -> Option<Cookie> {
        self.inner.get_cookie(host, name)
    }

    /// Stores a cookie, then persists the updated state.
    fn set_cookie(&mut self, host: &str, cookie: Cookie) -> Result<()> {
        self.inner.set_cookie(host, cookie)?;
        self.persist()
    }
}
