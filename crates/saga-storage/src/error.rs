//! Errors raised by the SQLite catalog store.

use saga_core::CoreError;

/// Failure of a catalog store operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No row matches the lookup.
    #[error("no {entity} matching {id} in the catalog")]
    NotFound { entity: String, id: String },

    /// The database file exists but carries no catalog schema.
    #[error("catalog database is not initialized ({reason})")]
    NotInitialized { reason: String },

    /// Input rejected before or by a table constraint.
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// The new edge would let `depends` reach back to `node`.
    #[error("{node} cannot depend on {depends}: that would close a cycle")]
    CycleDetected { node: String, depends: String },

    #[error("connection error: {0}")]
    Connection(String),

    /// Begin or commit of a write transaction failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Applying schema step `name` failed.
    #[error("schema step {name} failed: {reason}")]
    Migration { name: String, reason: String },

    #[error(transparent)]
    Query(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// `entity` is the row kind ("entry", "book"), `id` what was looked up.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Bad input, as opposed to a failing database.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::CycleDetected { .. })
    }
}

/// Returns `true` if `err` is a UNIQUE, CHECK or FOREIGN KEY violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => CoreError::not_found(format!("{entity} {id}")),
            StorageError::Validation { message } => CoreError::validation(message),
            other => CoreError::repository(other),
        }
    }
}
