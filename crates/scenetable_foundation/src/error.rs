//! Error types for scenetable.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every message names the offending id, attribute, or value.

use std::fmt;

use thiserror::Error;

use crate::id::RecordId;
use crate::value::Value;

/// Result type alias using scenetable's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for scenetable operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches the record id to kinds that carry one, unless already set.
    #[must_use]
    pub fn with_record(mut self, record: &RecordId) -> Self {
        match &mut self.kind {
            ErrorKind::SchemaMismatch { id, .. }
            | ErrorKind::Validation { id, .. }
            | ErrorKind::UnknownType { id, .. } => {
                if id.is_none() {
                    *id = Some(record.clone());
                }
            }
            _ => {}
        }
        self
    }

    /// Creates a duplicate id error.
    #[must_use]
    pub fn duplicate_id(id: RecordId) -> Self {
        Self::new(ErrorKind::DuplicateId { id })
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(id: RecordId) -> Self {
        Self::new(ErrorKind::NotFound { id })
    }

    /// Creates a schema mismatch error for an undeclared attribute.
    #[must_use]
    pub fn schema_mismatch(type_tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch {
            id: None,
            type_tag: type_tag.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates a validation error for a rejected attribute value.
    #[must_use]
    pub fn validation(
        attribute: impl Into<String>,
        value: Value,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Validation {
            id: None,
            attribute: attribute.into(),
            value,
            expected: expected.into(),
        })
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(type_tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType {
            id: None,
            type_tag: type_tag.into(),
            reason: reason.into(),
        })
    }

    /// Creates a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>, row: Option<usize>) -> Self {
        Self::new(ErrorKind::MissingColumn {
            row,
            column: column.into(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Two records would share an id.
    #[error("duplicate id: {id}")]
    DuplicateId {
        /// The colliding id.
        id: RecordId,
    },

    /// No record has the given id.
    #[error("no record with id {id}")]
    NotFound {
        /// The missing id.
        id: RecordId,
    },

    /// An attribute or column is not declared by the target schema.
    #[error("{} of type {type_tag} has no attribute `{attribute}`", describe(.id.as_ref()))]
    SchemaMismatch {
        /// The record concerned, when known.
        id: Option<RecordId>,
        /// The schema's type tag.
        type_tag: String,
        /// The undeclared attribute name.
        attribute: String,
    },

    /// A value failed an attribute's type or domain constraint.
    #[error("invalid value {value:?} for `{attribute}` of {}: expected {expected}", describe(.id.as_ref()))]
    Validation {
        /// The record concerned, when known.
        id: Option<RecordId>,
        /// The attribute being written.
        attribute: String,
        /// The rejected value.
        value: Value,
        /// Description of the accepted values.
        expected: String,
    },

    /// A type discriminator could not be resolved to a schema.
    #[error("shape type `{type_tag}` proposed for {} is not usable: {reason}", describe(.id.as_ref()))]
    UnknownType {
        /// The record concerned, when known.
        id: Option<RecordId>,
        /// The unresolvable type tag.
        type_tag: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A required column or cell is absent.
    #[error("missing column `{column}`{}", .row.map(|r| format!(" in row {r}")).unwrap_or_default())]
    MissingColumn {
        /// Row index, when the cell of a single row is missing.
        row: Option<usize>,
        /// The column name.
        column: String,
    },

    /// A mutation was attempted while change events were being dispatched.
    #[error("collection mutated while dispatching change events")]
    ReentrantMutation,

    /// Table serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading or writing a table file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

fn describe(id: Option<&RecordId>) -> String {
    id.map_or_else(|| "record".to_string(), |id| format!("record {id}"))
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed (e.g. `reconcile`).
    pub operation: Option<String>,
    /// Row index in the input table.
    pub row: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the row index.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, self.row) {
            (Some(op), Some(row)) => write!(f, "during {op}, row {row}"),
            (Some(op), None) => write!(f, "during {op}"),
            (None, Some(row)) => write!(f, "row {row}"),
            (None, None) => Ok(()),
        }
    }
}
