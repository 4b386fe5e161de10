//! Database-specific error types and conversions.

use warden_core::error::CoreError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated on {entity}")]
    Duplicate { entity: String },

    /// Another transaction touched the same keys first. The statement
    /// did not commit and may be retried.
    #[error("Write conflict on {entity}: {source}")]
    WriteConflict {
        entity: String,
        source: surrealdb::Error,
    },

    #[error("Malformed row: {0}")]
    Decode(String),
}

/// How a failed write statement should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteFailure {
    /// A UNIQUE index already holds the value.
    Duplicate,
    /// Concurrent transactions collided on the same keys.
    Conflict,
    Other,
}

// The SDK surfaces both conditions below as opaque query errors, so
// they are told apart by message text:
//   IndexExists:  "Database index `idx_account_email` already contains
//                  'x@y', with record `account:⟨…⟩`"
//   TxRetryable:  "Transaction conflict: Write conflict, retry the
//                  transaction"
// If an upgrade rewords either message, the concurrent create tests in
// `tests/account_repository_test.rs` start failing.
const INDEX_EXISTS_MARKER: &str = "already contains";
const TX_CONFLICT_MARKERS: &[&str] = &["Transaction conflict", "retry the transaction"];

pub(crate) fn classify_write_message(message: &str) -> WriteFailure {
    if message.contains(INDEX_EXISTS_MARKER) {
        WriteFailure::Duplicate
    } else if TX_CONFLICT_MARKERS.iter().any(|m| message.contains(m)) {
        WriteFailure::Conflict
    } else {
        WriteFailure::Other
    }
}

impl DbError {
    /// Classify a failed write statement. Unique index violations
    /// become [`DbError::Duplicate`], transaction collisions become
    /// [`DbError::WriteConflict`], anything else stays a SurrealDB
    /// error.
    pub(crate) fn from_write(err: surrealdb::Error, entity: &str) -> Self {
        match classify_write_message(&err.to_string()) {
            WriteFailure::Duplicate => DbError::Duplicate {
                entity: entity.into(),
            },
            WriteFailure::Conflict => DbError::WriteConflict {
                entity: entity.into(),
                source: err,
            },
            WriteFailure::Other => DbError::Surreal(err),
        }
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            DbError::Duplicate { entity } => CoreError::AlreadyExists { entity },
            other => CoreError::Database(other.to_string()),
        }
    }
}
