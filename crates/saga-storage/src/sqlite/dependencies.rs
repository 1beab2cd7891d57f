//! Dependency edges and cycle detection for [`SqliteStore`].

use std::collections::{BTreeMap, HashSet, VecDeque};

use rusqlite::{Connection, Row, params};
use tracing::debug;

use saga_core::{DependencyRow, EntryId, GroupId};

use crate::error::{Result, StorageError, is_constraint_violation};
use crate::sqlite::entries::get_entry_on_conn;
use crate::sqlite::store::SqliteStore;

fn scan_row(row: &Row<'_>) -> rusqlite::Result<DependencyRow> {
    Ok(DependencyRow {
        depends: EntryId(row.get("depends")?),
        min_value: row.get("min_value")?,
        min_count: row.get("min_count")?,
    })
}

pub(crate) fn ungrouped_on_conn(conn: &Connection, node: EntryId) -> Result<Vec<DependencyRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT depends, min_value, min_count FROM dependency
         WHERE node = ?1 AND group_id IS NULL
         ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map(params![node.0], scan_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub(crate) fn grouped_on_conn(
    conn: &Connection,
    node: EntryId,
) -> Result<BTreeMap<GroupId, Vec<DependencyRow>>> {
    let mut stmt = conn.prepare_cached(
        "SELECT group_id, depends, min_value, min_count FROM dependency
         WHERE node = ?1 AND group_id IS NOT NULL
         ORDER BY group_id, rowid",
    )?;
    let rows = stmt.query_map(params![node.0], |row| {
        Ok((row.get::<_, GroupId>("group_id")?, scan_row(row)?))
    })?;

    let mut groups: BTreeMap<GroupId, Vec<DependencyRow>> = BTreeMap::new();
    for row in rows {
        let (group, dep) = row?;
        groups.entry(group).or_default().push(dep);
    }
    Ok(groups)
}

/// Detects whether adding the edge `node -> depends` would create a cycle.
/// Uses BFS from `depends` to see if `node` is reachable.
fn detect_cycle(conn: &Connection, node: EntryId, depends: EntryId) -> Result<()> {
    let mut visited: HashSet<EntryId> = HashSet::new();
    let mut queue: VecDeque<EntryId> = VecDeque::new();
    queue.push_back(depends);

    while let Some(current) = queue.pop_front() {
        if current == node {
            return Err(StorageError::CycleDetected {
                node: node.to_string(),
                depends: depends.to_string(),
            });
        }
        if !visited.insert(current) {
            continue;
        }
        let mut stmt = conn.prepare_cached("SELECT depends FROM dependency WHERE node = ?1")?;
        let next = stmt.query_map(params![current.0], |row| row.get::<_, i64>(0))?;
        for id in next {
            let id = EntryId(id?);
            if !visited.contains(&id) {
                queue.push_back(id);
            }
        }
    }
    Ok(())
}

fn validate_row(node: EntryId, row: &DependencyRow) -> Result<()> {
    if row.depends == node {
        return Err(StorageError::validation(format!(
            "entry {node} cannot depend on itself"
        )));
    }
    if row.min_value.is_some() && row.min_count.is_some() {
        return Err(StorageError::validation(
            "a dependency takes either a minimum value or a member count, not both",
        ));
    }
    Ok(())
}

pub(crate) fn add_dependencies_on_conn(
    conn: &Connection,
    node: EntryId,
    rows: &[DependencyRow],
) -> Result<Option<GroupId>> {
    if rows.is_empty() {
        return Err(StorageError::validation("no dependencies given"));
    }
    get_entry_on_conn(conn, node)?;

    let group = if rows.len() > 1 {
        let max: GroupId = conn.query_row(
            "SELECT COALESCE(MAX(group_id), 0) FROM dependency",
            [],
            |row| row.get(0),
        )?;
        Some(max + 1)
    } else {
        None
    };

    for row in rows {
        validate_row(node, row)?;
        get_entry_on_conn(conn, row.depends)?;
        detect_cycle(conn, node, row.depends)?;

        conn.execute(
            "INSERT INTO dependency (node, depends, min_value, min_count, group_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![node.0, row.depends.0, row.min_value, row.min_count, group],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StorageError::validation(format!(
                    "{node} already depends on {}",
                    row.depends
                ))
            } else {
                StorageError::Query(e)
            }
        })?;
    }

    debug!(%node, count = rows.len(), ?group, "added dependencies");
    Ok(group)
}

pub(crate) fn delete_dependencies_on_conn(
    conn: &Connection,
    node: EntryId,
    depends: &[EntryId],
) -> Result<usize> {
    if depends.is_empty() {
        let removed = conn.execute("DELETE FROM dependency WHERE node = ?1", params![node.0])?;
        return Ok(removed);
    }

    let mut removed = 0;
    for dep in depends {
        removed += conn.execute(
            "DELETE FROM dependency WHERE node = ?1 AND depends = ?2",
            params![node.0, dep.0],
        )?;
    }
    Ok(removed)
}

impl SqliteStore {
    pub fn ungrouped_dependencies_impl(&self, node: EntryId) -> Result<Vec<DependencyRow>> {
        let conn = self.lock_conn()?;
        ungrouped_on_conn(&conn, node)
    }

    pub fn grouped_dependencies_impl(
        &self,
        node: EntryId,
    ) -> Result<BTreeMap<GroupId, Vec<DependencyRow>>> {
        let conn = self.lock_conn()?;
        grouped_on_conn(&conn, node)
    }

    /// Adds all rows in one transaction.
    pub fn add_dependencies_impl(
        &self,
        node: EntryId,
        rows: &[DependencyRow],
    ) -> Result<Option<GroupId>> {
        self.in_transaction(|conn| add_dependencies_on_conn(conn, node, rows))
    }

    pub fn delete_dependencies_impl(&self, node: EntryId, depends: &[EntryId]) -> Result<usize> {
        self.in_transaction(|conn| delete_dependencies_on_conn(conn, node, depends))
    }
}
