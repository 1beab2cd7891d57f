//! [`SqliteStore`] -- SQLite-backed catalog.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::sqlite::schema;

/// The catalog database. Implements [`Repository`](saga_core::Repository)
/// for the resolvers and [`Catalog`](crate::traits::Catalog) for the CLI.
///
/// One connection behind a `Mutex`; every operation holds the lock for its
/// whole statement or transaction.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the catalog file at `path`, creating file and schema when
    /// missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening catalog");

        let conn = Connection::open(path).map_err(|e| {
            StorageError::Connection(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::from_connection(conn)
    }

    /// Like [`SqliteStore::open`], but the file must already exist.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StorageError::NotInitialized {
                reason: format!("{} does not exist (run 'saga init')", path.display()),
            });
        }
        Self::open(path)
    }

    /// A throwaway catalog held in memory.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory catalog");
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("cannot open in-memory catalog: {e}")))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.configure_connection()?;
        store.init_schema()?;
        Ok(store)
    }

    /// Foreign keys must be on for the cascading deletes.
    fn configure_connection(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| StorageError::Connection(format!("cannot configure connection: {e}")))?;
        Ok(())
    }

    /// Brings the schema up to [`schema::CURRENT_SCHEMA_VERSION`].
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        if let Some(version) = schema_version(&conn) {
            if version >= schema::CURRENT_SCHEMA_VERSION {
                debug!(version, "schema up to date");
                return Ok(());
            }
        }

        for stmt in schema::SCHEMA_STATEMENTS {
            conn.execute_batch(stmt).map_err(|e| StorageError::Migration {
                name: "init_schema".into(),
                reason: format!("{e}\nStatement: {}", truncate(stmt.trim(), 120)),
            })?;
        }

        run_migrations(&conn)?;

        conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES ('schema_version', ?1)",
            params![schema::CURRENT_SCHEMA_VERSION.to_string()],
        )
        .map_err(|e| StorageError::Migration {
            name: "schema_version".into(),
            reason: e.to_string(),
        })?;

        info!(version = schema::CURRENT_SCHEMA_VERSION, "catalog schema created");
        Ok(())
    }

    /// Inserts the built-in books and node types. Rows that already exist
    /// are left alone. Returns the number of rows inserted.
    pub fn seed(&self) -> Result<usize> {
        self.in_transaction(|conn| {
            let mut inserted = 0;
            for name in schema::SEED_NODE_TYPES {
                inserted += conn.execute(
                    "INSERT OR IGNORE INTO node_type (name) VALUES (?1)",
                    params![name],
                )?;
            }
            for (title, short, abbreviation, isbn, authors) in schema::SEED_BOOKS {
                inserted += conn.execute(
                    "INSERT OR IGNORE INTO book (title, short, abbreviation, isbn, authors)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![title, short, abbreviation, isbn, authors],
                )?;
            }
            info!(inserted, "seeded books and node types");
            Ok(inserted)
        })
    }

    /// Runs `f` as one write; nothing is kept when it fails.
    pub(crate) fn in_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("begin: {e}")))?;

        let value = f(&tx)?;
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("commit: {e}")))?;
        Ok(value)
    }

    /// Locks the connection for the `*_on_conn` helpers.
    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(format!("connection lock poisoned: {e}")))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

/// `None` for a fresh file without a `config` table.
fn schema_version(conn: &Connection) -> Option<i32> {
    conn.query_row(
        "SELECT value FROM config WHERE key = 'schema_version'",
        [],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .ok()
    .flatten()
    .and_then(|v| v.parse().ok())
}

/// Each applied step leaves a `migration:<name>` row in `metadata`.
fn run_migrations(conn: &Connection) -> Result<()> {
    for &(name, sql) in schema::MIGRATIONS {
        let key = format!("migration:{name}");
        let applied: i64 = conn.query_row(
            "SELECT COUNT(*) FROM metadata WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        if applied > 0 {
            debug!(name, "schema step already applied");
            continue;
        }

        debug!(name, "applying schema step");
        conn.execute_batch(sql).map_err(|e| StorageError::Migration {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, 'applied')",
            params![key],
        )
        .map_err(|e| StorageError::Migration {
            name: name.to_string(),
            reason: format!("cannot record step: {e}"),
        })?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn schema_version_set() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        assert_eq!(schema_version(&conn), Some(schema::CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn migrations_recorded() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM metadata WHERE key LIKE 'migration:%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count as usize, schema::MIGRATIONS.len());
    }

    #[test]
    fn idempotent_init() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.init_schema().unwrap();
    }

    #[test]
    fn seed_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.seed().unwrap();
        assert_eq!(first, schema::SEED_NODE_TYPES.len() + schema::SEED_BOOKS.len());
        assert_eq!(store.seed().unwrap(), 0);
    }

    #[test]
    fn reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saga.db");
        assert!(SqliteStore::open_existing(&path).is_err());

        SqliteStore::open(&path).unwrap().seed().unwrap();
        let store = SqliteStore::open_existing(&path).unwrap();
        assert_eq!(store.seed().unwrap(), 0);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("äöü", 5), "äöü");
    }
}
