//! In-memory table store for MiniSQL.
//!
//! The [`Catalog`] maps lower-cased table names to [`Table`]s; lookup,
//! creation, and deletion are all case-insensitive. Each table owns its
//! schema (an ordered list of [`ColumnDef`]s) and its row storage, and
//! enforces the two row invariants on every append: the value count must
//! equal the column count, and every non-null value's runtime type must
//! match its column's declared type.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SqlError};
use crate::types::Value;

/// The four declarable column types.
///
/// DATE is stored as uninterpreted text; the engine does not validate
/// calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
    Date,
}

impl ColumnType {
    /// Whether a runtime value is storable in a column of this type.
    /// NULL is legal in any column; INT columns accept only integers while
    /// FLOAT columns accept integers as well as floats.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (ColumnType::Int, Value::Integer(_)) => true,
            (ColumnType::Float, Value::Integer(_) | Value::Float(_)) => true,
            (ColumnType::Text | ColumnType::Date, Value::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::Int => "INT",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "TEXT",
            ColumnType::Date => "DATE",
        })
    }
}

/// A single column declaration: name plus declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            column_type,
        }
    }
}

/// An in-memory table: schema plus row storage in arrival order.
#[derive(Debug, Clone)]
pub struct Table {
    /// Original-case name as written in the CREATE statement.
    pub name: String,
    /// Display title; defaults to the table name.
    pub title: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>, title: Option<String>) -> Self {
        let name = name.into();
        let title = title.unwrap_or_else(|| name.clone());
        Table {
            name,
            title,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one row after validating arity and per-column types.
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(SqlError::ArityMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }
        for (value, column) in values.iter().zip(&self.columns) {
            if !column.column_type.accepts(value) {
                return Err(SqlError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.column_type.to_string(),
                    got: value.type_name().to_string(),
                });
            }
        }
        self.rows.push(values);
        Ok(())
    }

    /// Index of the first column whose name matches case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Ordered column names, as a SELECT result header would show them.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// The collection of all tables, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, Table>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Create a table. Fails without side effects if a table with the same
    /// name (in any case) already exists.
    pub fn create_table(
        &mut self,
        name: &str,
        columns: Vec<ColumnDef>,
        title: Option<String>,
    ) -> Result<()> {
        let key = name.to_lowercase();
        if self.tables.contains_key(&key) {
            return Err(SqlError::DuplicateTable(name.to_string()));
        }
        self.tables.insert(key, Table::new(name, columns, title));
        Ok(())
    }

    /// Drop a table. Fails if no table with that name exists.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.tables
            .remove(&name.to_lowercase())
            .map(|_| ())
            .ok_or_else(|| SqlError::TableNotFound(name.to_string()))
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(&name.to_lowercase())
    }

    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(&name.to_lowercase())
    }

    /// Original-case table names, sorted for stable display.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.values().map(|t| t.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", ColumnType::Int),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("salary", ColumnType::Float),
        ]
    }

    #[test]
    fn create_and_lookup_are_case_insensitive() {
        let mut catalog = Catalog::new();
        catalog.create_table("Users", users_columns(), None).unwrap();
        assert!(catalog.get_table("users").is_some());
        assert!(catalog.get_table("USERS").is_some());
        assert_eq!(catalog.get_table("users").unwrap().name, "Users");
    }

    #[test]
    fn duplicate_create_fails_and_preserves_original() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", users_columns(), None).unwrap();
        catalog
            .get_table_mut("users")
            .unwrap()
            .add_row(vec![
                Value::Integer(1),
                Value::Text("a".into()),
                Value::Null,
            ])
            .unwrap();

        let err = catalog
            .create_table("USERS", vec![ColumnDef::new("x", ColumnType::Int)], None)
            .unwrap_err();
        assert_eq!(err, SqlError::DuplicateTable("USERS".into()));

        let table = catalog.get_table("users").unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn drop_missing_table_fails() {
        let mut catalog = Catalog::new();
        assert_eq!(
            catalog.drop_table("ghost").unwrap_err(),
            SqlError::TableNotFound("ghost".into())
        );
    }

    #[test]
    fn drop_is_case_insensitive() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", users_columns(), None).unwrap();
        catalog.drop_table("UsErS").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn add_row_rejects_wrong_arity() {
        let mut table = Table::new("users", users_columns(), None);
        let err = table
            .add_row(vec![Value::Integer(1), Value::Text("a".into())])
            .unwrap_err();
        assert_eq!(
            err,
            SqlError::ArityMismatch {
                expected: 3,
                got: 2
            }
        );
        assert!(table.rows.is_empty());
    }

    #[test]
    fn add_row_rejects_type_mismatch() {
        let mut table = Table::new("users", users_columns(), None);
        let err = table
            .add_row(vec![
                Value::Text("one".into()),
                Value::Text("a".into()),
                Value::Null,
            ])
            .unwrap_err();
        assert!(matches!(err, SqlError::TypeMismatch { .. }));
        assert!(table.rows.is_empty());
    }

    #[test]
    fn float_column_accepts_integer_values() {
        let mut table = Table::new("users", users_columns(), None);
        table
            .add_row(vec![
                Value::Integer(1),
                Value::Text("a".into()),
                Value::Integer(50000),
            ])
            .unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn int_column_rejects_float_values() {
        let mut table = Table::new("users", users_columns(), None);
        assert!(table
            .add_row(vec![
                Value::Float(1.5),
                Value::Text("a".into()),
                Value::Null,
            ])
            .is_err());
    }

    #[test]
    fn null_is_legal_in_every_column() {
        let mut table = Table::new("users", users_columns(), None);
        table
            .add_row(vec![Value::Null, Value::Null, Value::Null])
            .unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn date_columns_hold_uninterpreted_text() {
        let mut table = Table::new(
            "events",
            vec![ColumnDef::new("at", ColumnType::Date)],
            None,
        );
        table
            .add_row(vec![Value::Text("not-a-date".into())])
            .unwrap();
        assert!(table.add_row(vec![Value::Integer(20240101)]).is_err());
    }

    #[test]
    fn column_index_is_case_insensitive_first_match() {
        let table = Table::new("users", users_columns(), None);
        assert_eq!(table.column_index("NAME"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn column_names_preserve_declaration_order() {
        let table = Table::new("users", users_columns(), None);
        assert_eq!(table.column_names(), vec!["id", "name", "salary"]);
    }

    #[test]
    fn title_defaults_to_name() {
        let table = Table::new("users", users_columns(), None);
        assert_eq!(table.title, "users");
        let titled = Table::new("users", users_columns(), Some("All Users".into()));
        assert_eq!(titled.title, "All Users");
    }
}
