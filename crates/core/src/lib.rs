//! Shared primitives for all Rust crates in the Northwind API.

#![forbid(unsafe_code)]

use serde::Serialize;
use thiserror::Error;

/// Result type used across Northwind crates.
pub type AppResult<T> = Result<T, AppError>;

/// A single field-level rule violation reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: String,
    message: String,
}

impl FieldViolation {
    /// Creates a violation for one named field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the offending field name.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Accumulates field violations so a request reports every problem at once
/// instead of failing on the first.
#[derive(Debug, Default)]
pub struct Violations {
    entries: Vec<FieldViolation>,
}

impl Violations {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation for one field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldViolation::new(field, message));
    }

    /// Absorbs violations already reported elsewhere.
    pub fn extend(&mut self, entries: Vec<FieldViolation>) {
        self.entries.extend(entries);
    }

    /// Returns whether any violation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value when clean, otherwise a body validation failure
    /// listing every violation.
    pub fn into_result<T>(self, value: T) -> AppResult<T> {
        if self.entries.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self.entries))
        }
    }

    /// Returns the value when clean, otherwise a query validation failure
    /// listing every violation.
    pub fn into_query_result<T>(self, value: T) -> AppResult<T> {
        if self.entries.is_empty() {
            Ok(value)
        } else {
            Err(AppError::InvalidQuery(self.entries))
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{}: {}", violation.field(), violation.message()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or unwhitelisted filter, sort, or pagination parameter.
    #[error("invalid query parameters: {}", join_violations(.0))]
    InvalidQuery(Vec<FieldViolation>),

    /// Request body fails field-level constraints.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write blocked by existing dependent rows.
    #[error("{message} ({dependents} dependent rows)")]
    DependencyConflict {
        /// What is blocked and why.
        message: String,
        /// Exact count of rows that depend on the target.
        dependents: i64,
    },

    /// Uniqueness constraint violated.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Underlying store connection or transaction failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a body validation failure for one named field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }
}
