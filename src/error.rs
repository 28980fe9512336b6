//! Error types for statement preparation and execution.

use thiserror::Error;

/// Every failure this crate can surface.
///
/// All errors are local and synchronous. None of them are retried here; the
/// `Database` and `StatementExecutor` involved stay usable afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteError {
    /// The engine refused to open the database file.
    #[error("SQLite3 database open failed: {0}")]
    Open(String),

    /// An operation needed an open database.
    #[error("Cannot {0}: database is not open")]
    NotOpen(&'static str),

    /// The command text did not compile.
    #[error("Failed to prepare statement: {0}")]
    Prepare(String),

    /// Something other than whitespace or comments follows the first statement.
    #[error("Only one statement can be executed at a time")]
    MultiStatement,

    /// The number of supplied values does not match the placeholders.
    #[error("Bind parameter count mismatch: wanted {expected}, got {actual}")]
    BindArity { expected: usize, actual: usize },

    /// The engine failed while binding or stepping the statement.
    #[error("Failed to execute statement: {0}")]
    Execution(String),

    /// Quoting input contained a NUL byte.
    #[error("Cannot quote text containing a NUL byte; use a bind parameter instead")]
    EmbeddedNul,

    /// A connection URI could not be parsed.
    #[error("Invalid connection URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: &'static str },
}

impl SqliteError {
    pub(crate) fn bind_arity(expected: usize, actual: usize) -> Self {
        Self::BindArity { expected, actual }
    }

    pub(crate) fn invalid_uri(uri: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason,
        }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, SqliteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SqliteError::bind_arity(1, 2).to_string(),
            "Bind parameter count mismatch: wanted 1, got 2"
        );
        assert_eq!(
            SqliteError::NotOpen("execute statement").to_string(),
            "Cannot execute statement: database is not open"
        );
    }
}
