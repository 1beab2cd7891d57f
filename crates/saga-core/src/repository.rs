//! Read-only data access used by the resolvers.

use std::collections::BTreeMap;

use crate::entry::{DependencyRow, Entry, EntryId, EntryKey, EntryRef, GroupId};
use crate::error::{CoreError, Result};

/// Outcome of looking up an entry by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(EntryId),
    NotFound,
    /// Several entries share the name; carries every `(type, name)` pair.
    Ambiguous(Vec<EntryKey>),
}

/// Read access to entries, dependency edges and collection memberships.
pub trait Repository {
    /// Looks up an entry by name, optionally restricted to one type.
    fn find_entry(&self, entry_type: Option<&str>, name: &str) -> Result<Lookup>;

    fn get_entry(&self, id: EntryId) -> Result<Entry>;

    /// Edges of `id` that belong to no group.
    fn ungrouped_dependencies(&self, id: EntryId) -> Result<Vec<DependencyRow>>;

    /// Edges of `id` that belong to a group, keyed by group id. Rows keep
    /// their insertion order within a group.
    fn grouped_dependencies(&self, id: EntryId) -> Result<BTreeMap<GroupId, Vec<DependencyRow>>>;

    /// Members of the collection `id`, ordered by member name.
    fn collection_members(&self, id: EntryId) -> Result<Vec<EntryId>>;
}

/// Resolves a lookup to exactly one entry id.
pub fn resolve_entry<R: Repository + ?Sized>(
    repo: &R,
    entry_type: Option<&str>,
    name: &str,
) -> Result<EntryId> {
    match repo.find_entry(entry_type, name)? {
        Lookup::Found(id) => Ok(id),
        Lookup::NotFound => Err(CoreError::not_found(
            EntryRef::new(entry_type, name).to_string(),
        )),
        Lookup::Ambiguous(candidates) => Err(CoreError::AmbiguousEntry {
            name: name.to_string(),
            candidates,
        }),
    }
}

/// Resolves a parsed reference to exactly one entry id.
pub fn resolve_ref<R: Repository + ?Sized>(repo: &R, reference: &EntryRef) -> Result<EntryId> {
    resolve_entry(repo, reference.entry_type.as_deref(), &reference.name)
}

/// Parses and resolves compact `type:name` references one by one.
///
/// A reference that fails to parse or resolve is skipped; its error is
/// returned next to the ids that did resolve.
pub fn resolve_entries<R, I, S>(repo: &R, references: I) -> (Vec<EntryId>, Vec<CoreError>)
where
    R: Repository + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids = Vec::new();
    let mut errors = Vec::new();
    for reference in references {
        match EntryRef::parse(reference.as_ref()).and_then(|r| resolve_ref(repo, &r)) {
            Ok(id) => ids.push(id),
            Err(err) => errors.push(err),
        }
    }
    (ids, errors)
}
