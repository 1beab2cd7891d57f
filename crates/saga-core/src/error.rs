//! Error taxonomy for catalog lookups, templates and tree resolution.

use crate::entry::{EntryId, EntryKey};

/// Errors raised by the core while resolving entries and rendering trees.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No entry matches a `(type, name)` or bare-name lookup.
    #[error("there is no such entry in the database: {name}")]
    NotFound {
        /// The name (optionally prefixed with its type) that was looked up.
        name: String,
    },

    /// A bare-name lookup matched more than one entry.
    #[error("found {} entries ({}) for {name}", candidates.len(), join_candidates(candidates))]
    AmbiguousEntry {
        /// The name that was looked up.
        name: String,
        /// Every `(type, name)` pair sharing that name.
        candidates: Vec<EntryKey>,
    },

    /// A compact `type:name` reference or an input value is malformed.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A template could not be constructed.
    #[error("template configuration error: {message}")]
    Configuration {
        /// Description of the configuration failure.
        message: String,
    },

    /// Rendering was requested before a formatter was attached.
    #[error("precondition failed: {message}")]
    Precondition {
        /// Description of the missing precondition.
        message: String,
    },

    /// The dependency or collection graph loops back onto an ancestor.
    #[error("cyclic dependency: {}", format_path(path))]
    CyclicDependency {
        /// Entry ids from the root down to the repeated entry.
        path: Vec<EntryId>,
    },

    /// The data-access layer failed.
    #[error(transparent)]
    Repository(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a [`CoreError::NotFound`] for the given lookup name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates a [`CoreError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a [`CoreError::Configuration`] with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a [`CoreError::Precondition`] with the given message.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Wraps a data-access failure.
    pub fn repository(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Repository(Box::new(err))
    }

    /// Returns `true` if this is a [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a [`CoreError::AmbiguousEntry`].
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousEntry { .. })
    }
}

fn join_candidates(candidates: &[EntryKey]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_path(path: &[EntryId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
