use std::collections::BTreeMap;
use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::{Result, TagSearchError};

use super::PersistenceAdapter;

const SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    CREATE TABLE IF NOT EXISTS saved_searches (
        tag TEXT PRIMARY KEY,
        query TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Durable adapter backed by a single SQLite table.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| TagSearchError::mutex_poisoned("sqlite"))?;
        f(&conn)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        tracing::debug!(path = %path.display(), "opened saved search database");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
    }

    /// Last write time recorded for `tag`, RFC 3339.
    pub fn updated_at(&self, tag: &str) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;

        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT updated_at FROM saved_searches WHERE tag = ?1",
                    params![tag],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }
}

impl PersistenceAdapter for SqliteStore {
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT tag, query FROM saved_searches")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut out = BTreeMap::new();
            for row in rows {
                let (tag, query) = row?;
                out.insert(tag, query);
            }
            Ok(out)
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO saved_searches(tag, query, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(tag) DO UPDATE SET
                  query = excluded.query,
                  updated_at = excluded.updated_at
                ",
                params![key, value, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM saved_searches WHERE tag = ?1", params![key])?;
            Ok(())
        })
    }
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}
