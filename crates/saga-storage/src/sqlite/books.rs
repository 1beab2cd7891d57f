//! Book and node type listings for [`SqliteStore`].

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::sqlite::store::SqliteStore;
use crate::traits::Book;

pub(crate) fn books_on_conn(conn: &Connection, filter: Option<&str>) -> Result<Vec<Book>> {
    let pattern = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| format!("%{f}%"));

    let mut stmt = conn.prepare(
        "SELECT id, title, short, abbreviation, isbn, authors FROM book
         WHERE ?1 IS NULL OR title LIKE ?1 OR authors LIKE ?1 OR abbreviation LIKE ?1
         ORDER BY id",
    )?;
    let books = stmt
        .query_map(params![pattern], |row| {
            Ok(Book {
                id: row.get("id")?,
                title: row.get("title")?,
                short: row.get("short")?,
                abbreviation: row.get("abbreviation")?,
                isbn: row.get("isbn")?,
                authors: row.get("authors")?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

pub(crate) fn node_types_on_conn(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM node_type ORDER BY id")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

impl SqliteStore {
    pub fn books_impl(&self, filter: Option<&str>) -> Result<Vec<Book>> {
        let conn = self.lock_conn()?;
        books_on_conn(&conn, filter)
    }

    pub fn node_types_impl(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        node_types_on_conn(&conn)
    }
}
