//! Renderable tree payloads: single entries and OR-groups of entries.

use std::rc::Rc;

use crate::entry::{DependencyRow, Entry, EntryId};
use crate::error::{CoreError, Result};
use crate::template::Template;

/// Separator between the alternatives of a [`Fork`].
pub const DEFAULT_SEPARATOR: &str = " | ";

/// An entry prepared for display, with optional prerequisite annotations.
#[derive(Debug, Clone)]
pub struct RenderNode {
    entry: Entry,
    /// `"N+"` when a minimum value is required.
    limit: Option<String>,
    /// `"X from"` when a number of collection members is required.
    amount: Option<String>,
    formatter: Option<Rc<Template>>,
}

impl RenderNode {
    pub fn new(entry: Entry) -> Self {
        Self {
            entry,
            limit: None,
            amount: None,
            formatter: None,
        }
    }

    /// Builds the node for the required side of a dependency edge,
    /// carrying the edge's annotations.
    pub fn from_row(entry: Entry, row: &DependencyRow) -> Self {
        let mut node = Self::new(entry);
        node.set_limit(row.min_value);
        node.set_amount(row.min_count.as_deref());
        node
    }

    /// Sets the minimum value annotation. Only positive values are shown.
    pub fn set_limit(&mut self, value: Option<i64>) {
        self.limit = value.filter(|v| *v > 0).map(|v| format!("{v}+"));
    }

    /// Sets the member count annotation. Empty values are not shown.
    pub fn set_amount(&mut self, value: Option<&str>) {
        self.amount = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| format!("{v} from"));
    }

    pub fn with_formatter(mut self, formatter: Rc<Template>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn set_formatter(&mut self, formatter: Rc<Template>) {
        self.formatter = Some(formatter);
    }

    pub fn formatter(&self) -> Option<&Rc<Template>> {
        self.formatter.as_ref()
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn key(&self) -> EntryId {
        self.entry.id
    }

    pub fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    /// Field values offered to a template. The description is never shown
    /// on a tree line.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("name", self.entry.name.clone()),
            ("type", self.entry.entry_type.clone()),
            ("book", self.entry.book.clone()),
            ("page", self.entry.page.to_string()),
        ];
        if let Some(limit) = &self.limit {
            values.push(("limit", limit.clone()));
        }
        if let Some(amount) = &self.amount {
            values.push(("amount", amount.clone()));
        }
        values
    }

    /// Renders with the attached formatter.
    pub fn render(&self) -> Result<String> {
        let formatter = self.formatter.as_ref().ok_or_else(|| {
            CoreError::precondition(format!("no formatter attached to '{}'", self.entry.name))
        })?;
        Ok(self.render_with(formatter))
    }

    /// Renders with the given formatter, ignoring the attached one.
    ///
    /// Surrounding whitespace is trimmed and inner runs of whitespace are
    /// collapsed, so empty annotations leave no gaps.
    pub fn render_with(&self, formatter: &Template) -> String {
        let text = formatter.fill(self.values());
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// A set of alternative entries rendered as one line.
#[derive(Debug, Clone)]
pub struct Fork {
    members: Vec<RenderNode>,
    separator: String,
    formatter: Option<Rc<Template>>,
}

impl Default for Fork {
    fn default() -> Self {
        Self::new()
    }
}

impl Fork {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            formatter: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_formatter(mut self, formatter: Rc<Template>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn set_formatter(&mut self, formatter: Rc<Template>) {
        self.formatter = Some(formatter);
    }

    pub fn formatter(&self) -> Option<&Rc<Template>> {
        self.formatter.as_ref()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn add(&mut self, node: RenderNode) {
        self.members.push(node);
    }

    pub fn members(&self) -> &[RenderNode] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Renders every member with the fork's formatter and joins them.
    pub fn render(&self) -> Result<String> {
        let formatter = self
            .formatter
            .as_ref()
            .ok_or_else(|| CoreError::precondition("no formatter attached to alternative group"))?;
        Ok(self.render_with(formatter))
    }

    /// Renders every member with `formatter`. Members keep their own
    /// formatters.
    pub fn render_with(&self, formatter: &Template) -> String {
        self.members
            .iter()
            .map(|m| m.render_with(formatter))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

/// The payload of one composite tree node.
#[derive(Debug, Clone)]
pub enum Branch {
    Node(RenderNode),
    Fork(Fork),
}

impl Branch {
    /// The entry id used to look up further children. Forks have none.
    pub fn key(&self) -> Option<EntryId> {
        match self {
            Self::Node(node) => Some(node.key()),
            Self::Fork(_) => None,
        }
    }

    pub fn formatter(&self) -> Option<&Rc<Template>> {
        match self {
            Self::Node(node) => node.formatter(),
            Self::Fork(fork) => fork.formatter(),
        }
    }

    pub fn set_formatter(&mut self, formatter: Rc<Template>) {
        match self {
            Self::Node(node) => node.set_formatter(formatter),
            Self::Fork(fork) => fork.set_formatter(formatter),
        }
    }

    pub fn render(&self) -> Result<String> {
        match self {
            Self::Node(node) => node.render(),
            Self::Fork(fork) => fork.render(),
        }
    }

    pub fn render_with(&self, formatter: &Template) -> String {
        match self {
            Self::Node(node) => node.render_with(formatter),
            Self::Fork(fork) => fork.render_with(formatter),
        }
    }
}

impl From<RenderNode> for Branch {
    fn from(node: RenderNode) -> Self {
        Self::Node(node)
    }
}

impl From<Fork> for Branch {
    fn from(fork: Fork) -> Self {
        Self::Fork(fork)
    }
}
