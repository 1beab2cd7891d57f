//! Command handlers, one module per top-level subcommand.

pub mod book;
pub mod completion;
pub mod dependency;
pub mod entry;
pub mod init;
pub mod tree;
pub mod types;

use saga_core::{EntryId, Repository, resolve_entries};

use crate::output::print_skipped;

/// Resolves compact `type:name` items, reporting and skipping the ones that
/// cannot be resolved.
pub(crate) fn resolve_items<R: Repository + ?Sized>(repo: &R, items: &[String]) -> Vec<EntryId> {
    let (ids, errors) = resolve_entries(repo, items);
    errors.iter().for_each(print_skipped);
    ids
}
