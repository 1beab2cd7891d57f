//! Composite tree of rendered entries and its ASCII layout.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::entry::EntryId;
use crate::error::Result;
use crate::render::Branch;
use crate::template::Template;

/// Limb in front of every child except the last.
pub const LIMB: &str = " ├── ";
/// Limb in front of the last child.
pub const LAST_LIMB: &str = " └── ";
/// Continuation below a child that has later siblings.
pub const INDENT: &str = " │   ";
/// Continuation below the last child.
pub const LAST_INDENT: &str = "     ";

static NEXT_NODE: AtomicU64 = AtomicU64::new(1);

/// Identity of one tree node, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

/// A node of the composite tree: one branch payload plus ordered children.
#[derive(Debug)]
pub struct CompositeTree {
    handle: NodeHandle,
    branch: Branch,
    children: Vec<CompositeTree>,
}

impl CompositeTree {
    pub fn new(branch: impl Into<Branch>) -> Self {
        Self {
            handle: NodeHandle(NEXT_NODE.fetch_add(1, Ordering::Relaxed)),
            branch: branch.into(),
            children: Vec::new(),
        }
    }

    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    pub fn branch_mut(&mut self) -> &mut Branch {
        &mut self.branch
    }

    /// The entry id of the payload, `None` for forks.
    pub fn key(&self) -> Option<EntryId> {
        self.branch.key()
    }

    /// Appends a child and returns it.
    pub fn add(&mut self, child: CompositeTree) -> &mut CompositeTree {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Wraps `branch` in a new child node. A branch without a formatter
    /// inherits this node's formatter.
    pub fn add_child(&mut self, branch: impl Into<Branch>) -> &mut CompositeTree {
        let mut branch = branch.into();
        if branch.formatter().is_none() {
            if let Some(formatter) = self.branch.formatter() {
                branch.set_formatter(formatter.clone());
            }
        }
        self.add(CompositeTree::new(branch))
    }

    /// Removes the direct child with the given identity and returns the
    /// index it had.
    pub fn remove(&mut self, child: NodeHandle) -> Option<usize> {
        let index = self.children.iter().position(|c| c.handle == child)?;
        self.children.remove(index);
        Some(index)
    }

    pub fn count(&self) -> usize {
        self.children.len()
    }

    pub fn has_children(&self) -> bool {
        self.count() > 0
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> std::slice::Iter<'_, CompositeTree> {
        self.children.iter()
    }

    pub fn children_mut(&mut self) -> std::slice::IterMut<'_, CompositeTree> {
        self.children.iter_mut()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CompositeTree::size).sum::<usize>()
    }

    /// Renders every node with its own formatter.
    pub fn render(&self) -> Result<RenderedTree> {
        let mut lines = vec![self.branch.render()?];
        self.render_children("", None, &mut lines)?;
        Ok(RenderedTree { lines })
    }

    /// Renders every node with `formatter`.
    pub fn render_with(&self, formatter: &Template) -> RenderedTree {
        let mut lines = vec![self.branch.render_with(formatter)];
        // Infallible with an explicit formatter.
        let _ = self.render_children("", Some(formatter), &mut lines);
        RenderedTree { lines }
    }

    fn render_children(
        &self,
        indent: &str,
        formatter: Option<&Template>,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let (limb, continuation) = if i == last {
                (LAST_LIMB, LAST_INDENT)
            } else {
                (LIMB, INDENT)
            };
            let text = match formatter {
                Some(f) => child.branch.render_with(f),
                None => child.branch.render()?,
            };
            lines.push(format!("{indent}{limb}{text}"));
            child.render_children(&format!("{indent}{continuation}"), formatter, lines)?;
        }
        Ok(())
    }
}

/// The indented text of a rendered tree, one string per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTree {
    lines: Vec<String>,
}

impl RenderedTree {
    pub fn to_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for RenderedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
