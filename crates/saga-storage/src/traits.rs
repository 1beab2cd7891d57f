//! The write-side catalog API and its helper types.
//!
//! Reads used by tree rendering go through [`saga_core::Repository`]; the
//! command layer uses [`Catalog`] for everything else.

use serde::Serialize;

use saga_core::{DependencyRow, Entry, EntryId, GroupId, Repository};

use crate::error::Result;

/// A source book as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub short: String,
    pub abbreviation: String,
    pub isbn: String,
    pub authors: String,
}

/// Fields of an entry to be created.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Node type name.
    pub entry_type: String,
    pub name: String,
    /// Book abbreviation (e.g. "Core").
    pub book: String,
    pub page: i64,
    pub description: Option<String>,
}

/// Typed partial update for entries.
///
/// Only `Some` fields are applied; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdates {
    /// Book abbreviation.
    pub book: Option<String>,
    pub page: Option<i64>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl EntryUpdates {
    pub fn is_empty(&self) -> bool {
        self.book.is_none() && self.page.is_none() && self.description.is_none()
    }
}

/// Catalog maintenance on top of the read-only [`Repository`].
pub trait Catalog: Repository {
    /// Node type names in insertion order.
    fn node_types(&self) -> Result<Vec<String>>;

    /// Books whose title, authors or abbreviation contain `filter`.
    fn books(&self, filter: Option<&str>) -> Result<Vec<Book>>;

    fn create_entry(&self, entry: &NewEntry) -> Result<EntryId>;

    fn update_entry(&self, id: EntryId, updates: &EntryUpdates) -> Result<()>;

    /// Deletes an entry together with its dependency edges and memberships.
    fn delete_entry(&self, id: EntryId) -> Result<()>;

    /// Entries whose name (and, optionally, description) contains `query`.
    fn search_entries(
        &self,
        query: &str,
        entry_type: Option<&str>,
        include_description: bool,
    ) -> Result<Vec<Entry>>;

    /// Adds one dependency, or several as one group of alternatives.
    ///
    /// Returns the group id when more than one row was given. All rows are
    /// inserted or none is.
    fn add_dependencies(&self, node: EntryId, rows: &[DependencyRow]) -> Result<Option<GroupId>>;

    /// Removes the given dependencies of `node`, or all of them when
    /// `depends` is empty. Returns the number of edges removed.
    fn delete_dependencies(&self, node: EntryId, depends: &[EntryId]) -> Result<usize>;

    /// Adds members to a collection. Existing members are ignored. Returns
    /// the number of new memberships.
    fn add_collection_members(&self, tree: EntryId, leaves: &[EntryId]) -> Result<usize>;

    /// Removes the given members, or all of them when `leaves` is empty.
    fn delete_collection_members(&self, tree: EntryId, leaves: &[EntryId]) -> Result<usize>;
}
