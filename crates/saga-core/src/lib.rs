//! Core types for the saga rule catalog.
//!
//! This crate holds the entry model, the placeholder template engine and the
//! dependency/collection tree construction and rendering. Storage is reached
//! only through the [`repository::Repository`] trait.

pub mod entry;
pub mod error;
pub mod preset;
pub mod render;
pub mod repository;
pub mod resolver;
pub mod template;
pub mod tree;

#[cfg(test)]
mod testing;

pub use entry::{DependencyRow, Entry, EntryId, EntryKey, EntryRef, GroupId};
pub use error::{CoreError, Result};
pub use preset::Preset;
pub use render::{Branch, Fork, RenderNode};
pub use repository::{Lookup, Repository, resolve_entries, resolve_entry, resolve_ref};
pub use resolver::{
    CollectionResolver, DependencyResolver, build_collection_tree, build_dependency_tree,
};
pub use template::Template;
pub use tree::{CompositeTree, RenderedTree};
