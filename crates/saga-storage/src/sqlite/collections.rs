//! Collection membership operations for [`SqliteStore`].

use rusqlite::{Connection, params};
use tracing::debug;

use saga_core::EntryId;

use crate::error::{Result, StorageError};
use crate::sqlite::entries::get_entry_on_conn;
use crate::sqlite::store::SqliteStore;

pub(crate) fn members_on_conn(conn: &Connection, tree: EntryId) -> Result<Vec<EntryId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.leaf FROM collection c
         JOIN node n ON n.id = c.leaf
         WHERE c.tree = ?1
         ORDER BY n.name, n.id",
    )?;
    let ids = stmt
        .query_map(params![tree.0], |row| row.get::<_, i64>(0))?
        .map(|id| id.map(EntryId))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

pub(crate) fn add_members_on_conn(
    conn: &Connection,
    tree: EntryId,
    leaves: &[EntryId],
) -> Result<usize> {
    get_entry_on_conn(conn, tree)?;

    let mut added = 0;
    for leaf in leaves {
        if *leaf == tree {
            return Err(StorageError::validation(format!(
                "entry {tree} cannot be a member of itself"
            )));
        }
        get_entry_on_conn(conn, *leaf)?;
        added += conn.execute(
            "INSERT OR IGNORE INTO collection (tree, leaf) VALUES (?1, ?2)",
            params![tree.0, leaf.0],
        )?;
    }
    debug!(%tree, added, "added collection members");
    Ok(added)
}

pub(crate) fn delete_members_on_conn(
    conn: &Connection,
    tree: EntryId,
    leaves: &[EntryId],
) -> Result<usize> {
    if leaves.is_empty() {
        return Ok(conn.execute("DELETE FROM collection WHERE tree = ?1", params![tree.0])?);
    }

    let mut removed = 0;
    for leaf in leaves {
        removed += conn.execute(
            "DELETE FROM collection WHERE tree = ?1 AND leaf = ?2",
            params![tree.0, leaf.0],
        )?;
    }
    Ok(removed)
}

impl SqliteStore {
    pub fn collection_members_impl(&self, tree: EntryId) -> Result<Vec<EntryId>> {
        let conn = self.lock_conn()?;
        members_on_conn(&conn, tree)
    }

    pub fn add_collection_members_impl(&self, tree: EntryId, leaves: &[EntryId]) -> Result<usize> {
        self.in_transaction(|conn| add_members_on_conn(conn, tree, leaves))
    }

    pub fn delete_collection_members_impl(
        &self,
        tree: EntryId,
        leaves: &[EntryId],
    ) -> Result<usize> {
        self.in_transaction(|conn| delete_members_on_conn(conn, tree, leaves))
    }
}
