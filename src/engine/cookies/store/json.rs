//! JSON-backed cookie store.
//!
//! `JsonCookieStore` persists a cookie jar in a single JSON file on disk.
//!
//! ### I/O characteristics
//! - `persist_snapshot` rewrites the whole file. The new contents are written
//!   to a sibling temporary file which is then renamed over the old one, so a
//!   reader never observes a half-written file.
//! - A missing file loads as an empty jar; a file that does not parse loads
//!   as an empty jar too (and is overwritten by the next persist).
//!
//! ### Example
//! ```ignore
//! let store = JsonCookieStore::new("cookies.json".into());
//! let jar = PersistentCookieJar::open(store)?;
//! ```
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::cookies::cookie_jar::DefaultCookieJar;
use crate::engine::cookies::store::CookieStore;

/// On-disk representation of the jar.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieStoreFile {
    jar: DefaultCookieJar,
}

/// A JSON-based cookie store that persists cookies across sessions.
pub struct JsonCookieStore {
    /// Path to the JSON file where cookies are stored.
    path: PathBuf,
    /// Serializes writers so two snapshots never interleave on disk.
    write_lock: Mutex<()>,
}

impl JsonCookieStore {
    /// Creates a JSON cookie store at `path`. The file is created on first persist.
    pub fn new(path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cookies.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CookieStore for JsonCookieStore {
    fn load(&self) -> Result<DefaultCookieJar> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DefaultCookieJar::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read cookie store {}", self.path.display()))
            }
        };

        match serde_json::from_str::<CookieStoreFile>(&contents) {
            Ok(file) => Ok(file.jar),
            Err(e) => {
                log::warn!("cookie store {} is malformed, starting empty: {}", self.path.display(), e);
                Ok(DefaultCookieJar::new())
            }
        }
    }

    fn persist_snapshot(&self, snapshot: &DefaultCookieJar) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let contents = serde_json::to_string_pretty(&CookieStoreFile { jar: snapshot.clone() })
            .context("cannot serialize cookies")?;

        let tmp = self.temp_path();
        fs::write(&tmp, contents).with_context(|| format!("cannot write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("cannot replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cookies::{Cookie, CookieJar, PersistentCookieJar};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCookieStore::new(dir.path().join("cookies.json"));
        assert!(store.load().unwrap().entries.is_empty());
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        {
            let jar = PersistentCookieJar::open(JsonCookieStore::new(path.clone())).unwrap();
            jar.write()
                .unwrap()
                .set_cookie("www.example.com", Cookie::session("consent", r#"["necessary"]"#, "example.com"))
                .unwrap();
        }

        let reopened = PersistentCookieJar::open(JsonCookieStore::new(path.clone())).unwrap();
        let cookie = reopened.read().unwrap().get_cookie("example.com", "consent").unwrap();
        assert_eq!(cookie.value, r#"["necessary"]"#);

        // no temporary file is left behind
        assert!(!dir.path().join("cookies.json.tmp").exists());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "{ definitely not json").unwrap();

        let store = JsonCookieStore::new(path);
        assert!(store.load().unwrap().entries.is_empty());
    }
}
