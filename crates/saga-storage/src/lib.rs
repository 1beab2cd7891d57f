//! Storage backend for the saga catalog.
//!
//! Provides the [`Catalog`] trait and a SQLite implementation
//! ([`SqliteStore`]) of both [`Catalog`] and [`saga_core::Repository`].

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::{Book, Catalog, EntryUpdates, NewEntry};

use std::collections::BTreeMap;

use saga_core::{DependencyRow, Entry, EntryId, GroupId, Lookup, Repository};

use crate::error::Result;

impl Repository for SqliteStore {
    fn find_entry(&self, entry_type: Option<&str>, name: &str) -> saga_core::Result<Lookup> {
        Ok(self.find_entry_impl(entry_type, name)?)
    }

    fn get_entry(&self, id: EntryId) -> saga_core::Result<Entry> {
        Ok(self.get_entry_impl(id)?)
    }

    fn ungrouped_dependencies(&self, id: EntryId) -> saga_core::Result<Vec<DependencyRow>> {
        Ok(self.ungrouped_dependencies_impl(id)?)
    }

    fn grouped_dependencies(
        &self,
        id: EntryId,
    ) -> saga_core::Result<BTreeMap<GroupId, Vec<DependencyRow>>> {
        Ok(self.grouped_dependencies_impl(id)?)
    }

    fn collection_members(&self, id: EntryId) -> saga_core::Result<Vec<EntryId>> {
        Ok(self.collection_members_impl(id)?)
    }
}

impl Catalog for SqliteStore {
    fn node_types(&self) -> Result<Vec<String>> {
        self.node_types_impl()
    }

    fn books(&self, filter: Option<&str>) -> Result<Vec<Book>> {
        self.books_impl(filter)
    }

    fn create_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        self.create_entry_impl(entry)
    }

    fn update_entry(&self, id: EntryId, updates: &EntryUpdates) -> Result<()> {
        self.update_entry_impl(id, updates)
    }

    fn delete_entry(&self, id: EntryId) -> Result<()> {
        self.delete_entry_impl(id)
    }

    fn search_entries(
        &self,
        query: &str,
        entry_type: Option<&str>,
        include_description: bool,
    ) -> Result<Vec<Entry>> {
        self.search_entries_impl(query, entry_type, include_description)
    }

    fn add_dependencies(&self, node: EntryId, rows: &[DependencyRow]) -> Result<Option<GroupId>> {
        self.add_dependencies_impl(node, rows)
    }

    fn delete_dependencies(&self, node: EntryId, depends: &[EntryId]) -> Result<usize> {
        self.delete_dependencies_impl(node, depends)
    }

    fn add_collection_members(&self, tree: EntryId, leaves: &[EntryId]) -> Result<usize> {
        self.add_collection_members_impl(tree, leaves)
    }

    fn delete_collection_members(&self, tree: EntryId, leaves: &[EntryId]) -> Result<usize> {
        self.delete_collection_members_impl(tree, leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use saga_core::{build_collection_tree, build_dependency_tree, resolve_entry};

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed().unwrap();
        store
    }

    fn entry(store: &SqliteStore, entry_type: &str, name: &str, page: i64) -> EntryId {
        store
            .create_entry(&NewEntry {
                entry_type: entry_type.into(),
                name: name.into(),
                book: "Core".into(),
                page,
                description: None,
            })
            .unwrap()
    }

    #[test]
    fn dependency_tree_from_sqlite() {
        let store = store();
        let feat = entry(&store, "Feat", "Force Training", 85);
        let sens = entry(&store, "Feat", "Force Sensitivity", 85);
        let utf = entry(&store, "Skill", "Use the Force", 72);
        let wis = entry(&store, "Ability", "Wisdom", 11);
        let cha = entry(&store, "Ability", "Charisma", 12);

        store.add_dependencies(feat, &[DependencyRow::plain(sens)]).unwrap();
        store.add_dependencies(feat, &[DependencyRow::plain(utf)]).unwrap();
        store
            .add_dependencies(
                feat,
                &[
                    DependencyRow {
                        depends: wis,
                        min_value: Some(13),
                        min_count: None,
                    },
                    DependencyRow {
                        depends: cha,
                        min_value: Some(13),
                        min_count: None,
                    },
                ],
            )
            .unwrap();

        let rendered = build_dependency_tree(&store, feat, true).unwrap();
        assert_eq!(
            rendered.to_lines(),
            [
                "Force Training (Feat, Core Rulebook p.85)",
                " ├── Force Sensitivity (Feat, Core Rulebook p.85)",
                " ├── Use the Force (Skill, Core Rulebook p.72)",
                " └── Wisdom 13+ (Ability, Core Rulebook p.11) | Charisma 13+ (Ability, Core Rulebook p.12)",
            ]
        );
    }

    #[test]
    fn collection_tree_from_sqlite() {
        let store = store();
        let jedi = entry(&store, "Class", "Jedi", 40);
        let block = entry(&store, "Talent", "Block", 43);
        let deflect = entry(&store, "Talent", "Deflect", 43);
        store.add_collection_members(jedi, &[deflect, block]).unwrap();

        let rendered = build_collection_tree(&store, jedi, None, false).unwrap();
        assert_eq!(
            rendered.to_lines(),
            ["Jedi (Class)", " ├── Block (Talent)", " └── Deflect (Talent)"]
        );
    }

    #[test]
    fn lookup_errors_surface_through_core() {
        let store = store();
        entry(&store, "Skill", "Pilot", 71);
        entry(&store, "Feat", "Pilot", 88);

        assert!(resolve_entry(&store, None, "Pilot").unwrap_err().is_ambiguous());
        assert!(resolve_entry(&store, None, "Jump").unwrap_err().is_not_found());
        assert!(store.get_entry(EntryId(404)).unwrap_err().is_not_found());
    }
}
