//! Unified error handling for MiniSQL.
//!
//! This module defines [`SqlError`], the single error type propagated
//! throughout the engine, from the tokenizer and parser through statement
//! execution up to the public API surface.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, SqlError>`.
//!
//! The taxonomy follows the phases of the pipeline: [`SqlError::Syntax`]
//! covers both lexical failures (an unrecognized character or unterminated
//! string surfaces as an error token, which the parser rejects) and grammar
//! failures, and always carries a source position. The remaining variants are
//! semantic failures detected during execution against the catalog.

use thiserror::Error;

/// The canonical error type for all MiniSQL operations.
///
/// Every fallible function in the codebase returns this type (via the
/// [`Result`] alias). Variants are organised by pipeline phase so that
/// callers can match on the error category without inspecting free-form
/// strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlError {
    /// The query text could not be tokenized or parsed. `line` and `column`
    /// are 1-based and point at the offending token's start.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
    },

    /// The referenced table does not exist in the catalog.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A table with the given name already exists (names compare
    /// case-insensitively).
    #[error("table already exists: {0}")]
    DuplicateTable(String),

    /// The referenced column does not exist in the target table.
    #[error("column not found: {column} in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// A row was supplied with the wrong number of values for its table.
    #[error("column count mismatch: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// A value's runtime type disagrees with its column's declared type.
    #[error("type mismatch for column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    /// Two values could not be ordered or combined during expression
    /// evaluation (e.g. `'abc' < 3`, or `NULL + 1`).
    #[error("type error: {0}")]
    TypeError(String),

    /// Division by zero during expression evaluation.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed the 64-bit value range.
    #[error("overflow: {0}")]
    Overflow(String),

    /// The statement or expression uses a shape the executor does not
    /// support (e.g. projecting a literal in a SELECT column list).
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// A specialised [`Result`] type for MiniSQL operations.
pub type Result<T> = std::result::Result<T, SqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_human_readable() {
        let cases: Vec<(SqlError, &str)> = vec![
            (
                SqlError::Syntax {
                    message: "expected Identifier, got Comma".into(),
                    line: 2,
                    column: 14,
                },
                "syntax error at line 2, column 14: expected Identifier, got Comma",
            ),
            (
                SqlError::TableNotFound("users".into()),
                "table not found: users",
            ),
            (
                SqlError::DuplicateTable("users".into()),
                "table already exists: users",
            ),
            (
                SqlError::ColumnNotFound {
                    table: "users".into(),
                    column: "email".into(),
                },
                "column not found: email in table users",
            ),
            (
                SqlError::ArityMismatch {
                    expected: 3,
                    got: 2,
                },
                "column count mismatch: expected 3, got 2",
            ),
            (
                SqlError::TypeMismatch {
                    column: "age".into(),
                    expected: "INT".into(),
                    got: "TEXT".into(),
                },
                "type mismatch for column age: expected INT, got TEXT",
            ),
            (
                SqlError::TypeError("cannot compare TEXT and INT".into()),
                "type error: cannot compare TEXT and INT",
            ),
            (SqlError::DivisionByZero, "division by zero"),
            (
                SqlError::Overflow("integer addition".into()),
                "overflow: integer addition",
            ),
            (
                SqlError::Unsupported("JOIN execution".into()),
                "unsupported operation: JOIN execution",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn errors_are_comparable_for_tests() {
        assert_eq!(
            SqlError::TableNotFound("t".into()),
            SqlError::TableNotFound("t".into())
        );
        assert_ne!(
            SqlError::TableNotFound("t".into()),
            SqlError::DuplicateTable("t".into())
        );
    }
}
