//! SQLite-backed cookie store.
//!
//! `SqliteCookieStore` persists a cookie jar in a SQLite database, one row per
//! cookie.
//!
//! ## Design
//! - One **table** (`cookies`) keyed by `(bucket, name)`, where
//!   `bucket` is the jar bucket (cookie domain, or the setting host for
//!   host-only cookies).
//! - `persist_snapshot` replaces the full set of rows in one transaction
//!   (DELETE + INSERT), so the persisted state is always a complete snapshot.
//! - Database access is via an `r2d2` pool for safe multi-threaded use.
//!
//! ## Example
//! ```ignore
//! let store = SqliteCookieStore::new("cookies.sqlite".into())?;
//! let jar = PersistentCookieJar::open(store)?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::rusqlite::params;
use r2d2_sqlite::SqliteConnectionManager;

use crate::engine::cookies::cookie_jar::DefaultCookieJar;
use crate::engine::cookies::store::CookieStore;
use crate::engine::cookies::Cookie;

/// A SQLite-based cookie store that persists cookies across sessions.
pub struct SqliteCookieStore {
    /// Connection pool for SQLite database (so it can run multithreaded)
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteCookieStore {
    /// Opens (or creates) a SQLite database at `path` and ensures the schema exists.
    pub fn new(path: PathBuf) -> Result<Arc<Self>> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager).context("cannot create SQLite pool")?;

        {
            let conn = pool.get().context("cannot get DB connection")?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS cookies (
                    bucket TEXT NOT NULL,
                    name TEXT NOT NULL,
                    value TEXT NOT NULL,
                    domain TEXT,
                    PRIMARY KEY (bucket, name)
                );",
            )
            .context("cannot create cookies table")?;
        }

        Ok(Arc::new(Self { pool }))
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().context("cannot get DB connection")
    }
}

impl CookieStore for SqliteCookieStore {
    fn load(&self) -> Result<DefaultCookieJar> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT bucket, name, value, domain FROM cookies",
        )?;

        let rows = stmt.query_map([], |row| {
            let bucket: String = row.get(0)?;
            let entry = Cookie {
                name: row.get(1)?,
                value: row.get(2)?,
                domain: row.get(3)?,
            };
            Ok((bucket, entry))
        })?;

        let mut jar = DefaultCookieJar::new();
        for result in rows {
            match result {
                Ok((bucket, entry)) => jar.entries.entry(bucket).or_default().push(entry),
                Err(e) => log::warn!("skipping unreadable cookie row: {}", e),
            }
        }

        Ok(jar)
    }

    fn persist_snapshot(&self, snapshot: &DefaultCookieJar) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM cookies", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO cookies (bucket, name, value, domain) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for (bucket, cookies) in &snapshot.entries {
                for cookie in cookies {
                    stmt.execute(params![bucket, cookie.name, cookie.value, cookie.domain])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}
