//! Builds composite trees from dependency edges and collection memberships.
//!
//! Dependency trees follow ungrouped prerequisites recursively. Each group
//! of alternatives becomes a single [`Fork`] child that is not followed any
//! further.
//!
//! Both resolvers track the path from the root to the node being resolved.
//! Meeting an entry that is already on the path fails with
//! [`CoreError::CyclicDependency`]; an entry reached through two separate
//! branches is rendered on both.

use std::rc::Rc;

use tracing::debug;

use crate::entry::{DependencyRow, EntryId};
use crate::error::{CoreError, Result};
use crate::preset::Preset;
use crate::render::{DEFAULT_SEPARATOR, Fork, RenderNode};
use crate::repository::Repository;
use crate::template::Template;
use crate::tree::{CompositeTree, RenderedTree};

/// Resolves the prerequisite closure of an entry.
pub struct DependencyResolver<'a, R: Repository + ?Sized> {
    repo: &'a R,
    formatter: Rc<Template>,
    separator: String,
}

impl<'a, R: Repository + ?Sized> DependencyResolver<'a, R> {
    pub fn new(repo: &'a R, formatter: Template) -> Self {
        Self {
            repo,
            formatter: Rc::new(formatter),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Separator placed between the alternatives of a group.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Creates the root node for `id`.
    pub fn root(&self, id: EntryId) -> Result<CompositeTree> {
        let entry = self.repo.get_entry(id)?;
        Ok(CompositeTree::new(
            RenderNode::new(entry).with_formatter(self.formatter.clone()),
        ))
    }

    /// Adds the dependencies of the tree's root as children, recursively.
    pub fn resolve(&self, tree: &mut CompositeTree) -> Result<()> {
        let mut path = Vec::new();
        self.resolve_at(tree, &mut path)
    }

    /// Builds and renders the full dependency tree of `id`.
    pub fn build(&self, id: EntryId) -> Result<RenderedTree> {
        let mut tree = self.root(id)?;
        self.resolve(&mut tree)?;
        tree.render()
    }

    fn resolve_at(&self, tree: &mut CompositeTree, path: &mut Vec<EntryId>) -> Result<()> {
        let Some(id) = tree.key() else {
            return Ok(());
        };
        enter(path, id)?;
        debug!(entry = %id, depth = path.len(), "resolving dependencies");

        let first = tree.count();
        for row in self.repo.ungrouped_dependencies(id)? {
            tree.add_child(self.node(&row)?);
        }
        for child in tree.children_mut().skip(first) {
            self.resolve_at(child, path)?;
        }

        for (group, rows) in self.repo.grouped_dependencies(id)? {
            debug!(entry = %id, group, alternatives = rows.len(), "adding alternative group");
            let mut fork = Fork::new()
                .with_separator(self.separator.clone())
                .with_formatter(self.formatter.clone());
            for row in &rows {
                fork.add(self.node(row)?);
            }
            tree.add_child(fork);
        }

        path.pop();
        Ok(())
    }

    fn node(&self, row: &DependencyRow) -> Result<RenderNode> {
        let entry = self.repo.get_entry(row.depends)?;
        Ok(RenderNode::from_row(entry, row).with_formatter(self.formatter.clone()))
    }
}

/// Resolves the members of a collection, down to an optional depth.
pub struct CollectionResolver<'a, R: Repository + ?Sized> {
    repo: &'a R,
    formatter: Rc<Template>,
    depth: Option<u32>,
}

impl<'a, R: Repository + ?Sized> CollectionResolver<'a, R> {
    pub fn new(repo: &'a R, formatter: Template) -> Self {
        Self {
            repo,
            formatter: Rc::new(formatter),
            depth: None,
        }
    }

    /// Limits the number of member levels below the root. `Some(0)` keeps
    /// only the root, `None` follows every level.
    pub fn with_depth(mut self, depth: Option<u32>) -> Self {
        self.depth = depth;
        self
    }

    pub fn root(&self, id: EntryId) -> Result<CompositeTree> {
        let entry = self.repo.get_entry(id)?;
        Ok(CompositeTree::new(
            RenderNode::new(entry).with_formatter(self.formatter.clone()),
        ))
    }

    pub fn resolve(&self, tree: &mut CompositeTree) -> Result<()> {
        let mut path = Vec::new();
        self.resolve_at(tree, 0, &mut path)
    }

    pub fn build(&self, id: EntryId) -> Result<RenderedTree> {
        let mut tree = self.root(id)?;
        self.resolve(&mut tree)?;
        tree.render()
    }

    fn resolve_at(&self, tree: &mut CompositeTree, level: u32, path: &mut Vec<EntryId>) -> Result<()> {
        if self.depth.is_some_and(|max| level >= max) {
            return Ok(());
        }
        let Some(id) = tree.key() else {
            return Ok(());
        };
        enter(path, id)?;
        debug!(collection = %id, level, "resolving members");

        for member in self.repo.collection_members(id)? {
            let entry = self.repo.get_entry(member)?;
            tree.add_child(RenderNode::new(entry).with_formatter(self.formatter.clone()));
        }
        for child in tree.children_mut() {
            self.resolve_at(child, level + 1, path)?;
        }

        path.pop();
        Ok(())
    }
}

/// Pushes `id` onto the ancestor path, failing if it is already there.
fn enter(path: &mut Vec<EntryId>, id: EntryId) -> Result<()> {
    let seen = path.contains(&id);
    path.push(id);
    if seen {
        return Err(CoreError::CyclicDependency { path: path.clone() });
    }
    Ok(())
}

/// Renders the dependency tree of `root`. `verbose` adds book citations.
pub fn build_dependency_tree<R: Repository + ?Sized>(
    repo: &R,
    root: EntryId,
    verbose: bool,
) -> Result<RenderedTree> {
    let formatter = Preset::for_dependencies(verbose).build()?;
    DependencyResolver::new(repo, formatter).build(root)
}

/// Renders the collection tree of `root`, `depth` levels deep.
pub fn build_collection_tree<R: Repository + ?Sized>(
    repo: &R,
    root: EntryId,
    depth: Option<u32>,
    verbose: bool,
) -> Result<RenderedTree> {
    let formatter = Preset::for_collections(verbose).build()?;
    CollectionResolver::new(repo, formatter)
        .with_depth(depth)
        .build(root)
}
