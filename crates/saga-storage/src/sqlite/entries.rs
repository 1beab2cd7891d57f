//! Entry lookup and CRUD operations for [`SqliteStore`].

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use saga_core::{Entry, EntryId, Lookup};

use crate::error::{Result, StorageError, is_constraint_violation};
use crate::sqlite::store::SqliteStore;
use crate::traits::{EntryUpdates, NewEntry};

/// Columns of an [`Entry`], joined with its type and book.
const ENTRY_SELECT: &str = "SELECT n.id, n.name, t.name AS type, n.description, b.short AS book, n.page
     FROM node n
     JOIN node_type t ON t.id = n.type
     JOIN book b ON b.id = n.book";

/// Maps a row selected with [`ENTRY_SELECT`] to an [`Entry`].
pub(crate) fn scan_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: EntryId(row.get("id")?),
        name: row.get("name")?,
        entry_type: row.get("type")?,
        description: row.get("description")?,
        book: row.get("book")?,
        page: row.get("page")?,
    })
}

pub(crate) fn get_entry_on_conn(conn: &Connection, id: EntryId) -> Result<Entry> {
    let sql = format!("{ENTRY_SELECT} WHERE n.id = ?1");
    conn.query_row(&sql, params![id.0], scan_entry)
        .optional()?
        .ok_or_else(|| StorageError::not_found("entry", id.to_string()))
}

pub(crate) fn find_entry_on_conn(
    conn: &Connection,
    entry_type: Option<&str>,
    name: &str,
) -> Result<Lookup> {
    let sql = format!(
        "{ENTRY_SELECT} WHERE n.name = ?1 AND (?2 IS NULL OR t.name = ?2) ORDER BY t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params![name.trim(), entry_type.map(str::trim)], scan_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(match entries.as_slice() {
        [] => Lookup::NotFound,
        [entry] => Lookup::Found(entry.id),
        many => Lookup::Ambiguous(many.iter().map(Entry::key).collect()),
    })
}

/// Resolves a node type name to its row id.
fn type_id(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM node_type WHERE name = ?1",
        params![name.trim()],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| StorageError::validation(format!("unknown node type '{name}'")))
}

/// Resolves a book abbreviation to its row id.
fn book_id(conn: &Connection, abbreviation: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM book WHERE abbreviation = ?1",
        params![abbreviation.trim()],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| StorageError::validation(format!("unknown book '{abbreviation}'")))
}

fn check_page(page: i64) -> Result<()> {
    if page < 1 {
        return Err(StorageError::validation(format!(
            "page must be a positive number, got {page}"
        )));
    }
    Ok(())
}

pub(crate) fn insert_entry(conn: &Connection, entry: &NewEntry) -> Result<EntryId> {
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(StorageError::validation("entry name must not be empty"));
    }
    check_page(entry.page)?;
    let type_id = type_id(conn, &entry.entry_type)?;
    let book_id = book_id(conn, &entry.book)?;

    conn.execute(
        "INSERT INTO node (name, type, description, book, page) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, type_id, entry.description, book_id, entry.page],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            StorageError::validation(format!(
                "{}:{name} already exists",
                entry.entry_type
            ))
        } else {
            StorageError::Query(e)
        }
    })?;

    let id = EntryId(conn.last_insert_rowid());
    debug!(%id, name, "created entry");
    Ok(id)
}

pub(crate) fn update_entry_on_conn(
    conn: &Connection,
    id: EntryId,
    updates: &EntryUpdates,
) -> Result<()> {
    let mut set_clauses: Vec<&str> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(book) = &updates.book {
        set_clauses.push("book = ?");
        param_values.push(Box::new(book_id(conn, book)?));
    }
    if let Some(page) = updates.page {
        check_page(page)?;
        set_clauses.push("page = ?");
        param_values.push(Box::new(page));
    }
    if let Some(description) = &updates.description {
        set_clauses.push("description = ?");
        param_values.push(Box::new(description.clone()));
    }

    if set_clauses.is_empty() {
        // Still report a missing entry.
        get_entry_on_conn(conn, id)?;
        return Ok(());
    }

    let sql = format!("UPDATE node SET {} WHERE id = ?", set_clauses.join(", "));
    param_values.push(Box::new(id.0));
    let params: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();

    let affected = conn.execute(&sql, params.as_slice())?;
    if affected == 0 {
        return Err(StorageError::not_found("entry", id.to_string()));
    }
    Ok(())
}

pub(crate) fn delete_entry_on_conn(conn: &Connection, id: EntryId) -> Result<()> {
    let affected = conn.execute("DELETE FROM node WHERE id = ?1", params![id.0])?;
    if affected == 0 {
        return Err(StorageError::not_found("entry", id.to_string()));
    }
    debug!(%id, "deleted entry");
    Ok(())
}

pub(crate) fn search_entries_on_conn(
    conn: &Connection,
    query: &str,
    entry_type: Option<&str>,
    include_description: bool,
) -> Result<Vec<Entry>> {
    let text = if include_description {
        "(n.name LIKE ?1 OR n.description LIKE ?1)"
    } else {
        "n.name LIKE ?1"
    };
    let sql = format!(
        "{ENTRY_SELECT} WHERE {text} AND (?2 IS NULL OR t.name = ?2)
         ORDER BY n.name, t.id"
    );
    let pattern = format!("%{}%", query.trim());

    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params![pattern, entry_type], scan_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

impl SqliteStore {
    pub fn get_entry_impl(&self, id: EntryId) -> Result<Entry> {
        let conn = self.lock_conn()?;
        get_entry_on_conn(&conn, id)
    }

    pub fn find_entry_impl(&self, entry_type: Option<&str>, name: &str) -> Result<Lookup> {
        let conn = self.lock_conn()?;
        find_entry_on_conn(&conn, entry_type, name)
    }

    pub fn create_entry_impl(&self, entry: &NewEntry) -> Result<EntryId> {
        let conn = self.lock_conn()?;
        insert_entry(&conn, entry)
    }

    pub fn update_entry_impl(&self, id: EntryId, updates: &EntryUpdates) -> Result<()> {
        let conn = self.lock_conn()?;
        update_entry_on_conn(&conn, id, updates)
    }

    pub fn delete_entry_impl(&self, id: EntryId) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_entry_on_conn(&conn, id)
    }

    pub fn search_entries_impl(
        &self,
        query: &str,
        entry_type: Option<&str>,
        include_description: bool,
    ) -> Result<Vec<Entry>> {
        let conn = self.lock_conn()?;
        search_entries_on_conn(&conn, query, entry_type, include_description)
    }
}
