//! # MiniSQL
//!
//! An in-memory mini-RDBMS with a hand-written SQL front end: lexer,
//! recursive-descent parser, canonical SQL regeneration, and an AST
//! interpreter over an in-memory catalog. The dialect covers SELECT,
//! INSERT, UPDATE, DELETE, CREATE TABLE, and DROP TABLE over INT, FLOAT,
//! TEXT, and DATE columns.

pub mod catalog;
pub mod error;
pub mod execution;
pub mod sql;
pub mod types;

pub use error::{Result, SqlError};
pub use execution::StatementResult;
pub use types::Value;

use std::sync::Arc;

/// A row returned from a query.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Arc<Vec<String>>,
    pub values: Vec<Value>,
}

impl Row {
    /// Get a value by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }

    /// Get a value by column index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Query result set.
#[derive(Debug)]
pub struct QueryResult {
    pub columns: Arc<Vec<String>>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// The main database handle: an in-memory catalog plus the SQL pipeline.
#[derive(Default)]
pub struct Database {
    catalog: catalog::Catalog,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Database {
            catalog: catalog::Catalog::new(),
        }
    }

    /// Execute one SQL statement (an optional trailing `;` is allowed).
    pub fn execute(&mut self, sql_text: &str) -> Result<StatementResult> {
        let stmt = sql::parser::Parser::parse(sql_text)?;
        execution::execute_statement(&stmt, &mut self.catalog)
    }

    /// Execute a SELECT and wrap the result rows for column-name access.
    pub fn query(&mut self, sql_text: &str) -> Result<QueryResult> {
        match self.execute(sql_text)? {
            StatementResult::Rows { columns, rows, .. } => {
                let columns = Arc::new(columns);
                let rows = rows
                    .into_iter()
                    .map(|values| Row {
                        columns: Arc::clone(&columns),
                        values,
                    })
                    .collect();
                Ok(QueryResult { columns, rows })
            }
            _ => Err(SqlError::Unsupported(
                "query() requires a SELECT statement".into(),
            )),
        }
    }

    /// Parse a statement and return its canonical SQL spelling.
    pub fn canonicalize(&self, sql_text: &str) -> Result<String> {
        let stmt = sql::parser::Parser::parse(sql_text)?;
        Ok(sql::render::render(&stmt))
    }

    pub fn catalog(&self) -> &catalog::Catalog {
        &self.catalog
    }
}
