//! In-memory repository for resolver tests.

use std::collections::BTreeMap;

use crate::entry::{DependencyRow, Entry, EntryId, EntryKey, GroupId};
use crate::error::{CoreError, Result};
use crate::repository::{Lookup, Repository};

#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: BTreeMap<EntryId, Entry>,
    edges: Vec<(EntryId, DependencyRow, Option<GroupId>)>,
    members: Vec<(EntryId, EntryId)>,
}

impl MemoryRepository {
    pub fn entry(&mut self, name: &str, entry_type: &str, book: &str, page: i64) -> EntryId {
        let id = EntryId(self.entries.len() as i64 + 1);
        self.entries.insert(
            id,
            Entry {
                id,
                name: name.into(),
                entry_type: entry_type.into(),
                description: None,
                book: book.into(),
                page,
            },
        );
        id
    }

    pub fn depends(&mut self, node: EntryId, depends: EntryId) {
        self.edge(node, DependencyRow::plain(depends), None);
    }

    pub fn edge(&mut self, node: EntryId, row: DependencyRow, group: Option<GroupId>) {
        self.edges.push((node, row, group));
    }

    pub fn member(&mut self, tree: EntryId, leaf: EntryId) {
        self.members.push((tree, leaf));
    }
}

impl Repository for MemoryRepository {
    fn find_entry(&self, entry_type: Option<&str>, name: &str) -> Result<Lookup> {
        let name = name.to_lowercase();
        let matches: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| e.name.to_lowercase() == name)
            .filter(|e| entry_type.is_none_or(|t| e.entry_type.eq_ignore_ascii_case(t)))
            .collect();
        Ok(match matches.as_slice() {
            [] => Lookup::NotFound,
            [one] => Lookup::Found(one.id),
            many => Lookup::Ambiguous(many.iter().map(|e| e.key()).collect::<Vec<EntryKey>>()),
        })
    }

    fn get_entry(&self, id: EntryId) -> Result<Entry> {
        self.entries
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(id.to_string()))
    }

    fn ungrouped_dependencies(&self, id: EntryId) -> Result<Vec<DependencyRow>> {
        Ok(self
            .edges
            .iter()
            .filter(|(node, _, group)| *node == id && group.is_none())
            .map(|(_, row, _)| row.clone())
            .collect())
    }

    fn grouped_dependencies(&self, id: EntryId) -> Result<BTreeMap<GroupId, Vec<DependencyRow>>> {
        let mut groups: BTreeMap<GroupId, Vec<DependencyRow>> = BTreeMap::new();
        for (node, row, group) in &self.edges {
            if let (true, Some(group)) = (*node == id, group) {
                groups.entry(*group).or_default().push(row.clone());
            }
        }
        Ok(groups)
    }

    fn collection_members(&self, id: EntryId) -> Result<Vec<EntryId>> {
        let mut leaves: Vec<&Entry> = self
            .members
            .iter()
            .filter(|(tree, _)| *tree == id)
            .filter_map(|(_, leaf)| self.entries.get(leaf))
            .collect();
        leaves.sort_by_key(|e| e.name.to_lowercase());
        Ok(leaves.into_iter().map(|e| e.id).collect())
    }
}
