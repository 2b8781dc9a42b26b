//! Statement execution against an in-memory [`Catalog`].
//!
//! Execution is interpretation of the AST, one statement at a time; there
//! is no planner and no indexes. SELECT scans the first FROM table (JOIN
//! clauses parse but are not executed), filters rows against the WHERE
//! condition, and projects the requested columns into a fresh result set;
//! the stored rows are never mutated by a read. INSERT, UPDATE, and DELETE
//! mutate the table in place and report how many rows they touched.
//!
//! Identifier resolution is deliberately asymmetric: SELECT projections,
//! INSERT column lists, and UPDATE SET targets must name real columns
//! (unknown names fail with [`SqlError::ColumnNotFound`]), while inside
//! condition evaluation an identifier that matches no column falls back to
//! its own text, so `WHERE name = 'name'` can match vacuously instead of
//! erroring.

use crate::catalog::{Catalog, Table};
use crate::error::{Result, SqlError};
use crate::sql::ast::*;
use crate::types::Value;

/// The outcome of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementResult {
    /// Projected column names and the filtered, projected rows. `title`
    /// is the scanned table's display title, for result headers.
    Rows {
        title: String,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// Row count touched by INSERT, UPDATE, or DELETE.
    RowsAffected(usize),
    TableCreated(String),
    TableDropped(String),
}

/// Execute one statement, dispatching on its kind.
pub fn execute_statement(stmt: &Statement, catalog: &mut Catalog) -> Result<StatementResult> {
    match stmt {
        Statement::Select(select) => execute_select(select, catalog),
        Statement::Insert(insert) => execute_insert(insert, catalog),
        Statement::Update(update) => execute_update(update, catalog),
        Statement::Delete(delete) => execute_delete(delete, catalog),
        Statement::CreateTable(create) => execute_create(create, catalog),
        Statement::DropTable(drop) => execute_drop(drop, catalog),
    }
}

// ===========================================================================
// SELECT
// ===========================================================================

fn execute_select(select: &SelectStatement, catalog: &Catalog) -> Result<StatementResult> {
    let table_ref = select
        .tables
        .first()
        .ok_or_else(|| SqlError::Unsupported("SELECT without a FROM table".into()))?;
    let table = lookup(catalog, &table_ref.name)?;

    let projection = resolve_projection(table, &select.columns)?;

    let mut rows = Vec::new();
    for row in &table.rows {
        if matches(select.where_clause.as_ref(), table, row)? {
            rows.push(projection.iter().map(|&i| row[i].clone()).collect());
        }
    }

    let columns = projection
        .iter()
        .map(|&i| table.columns[i].name.clone())
        .collect();

    tracing::debug!(
        table = %table.name,
        rows = rows.len(),
        "select scan complete"
    );

    Ok(StatementResult::Rows {
        title: table.title.clone(),
        columns,
        rows,
    })
}

/// Resolve the projection list to column indices. A lone `*` selects every
/// column; anything else must be a plain identifier naming a real column.
fn resolve_projection(table: &Table, columns: &[Expr]) -> Result<Vec<usize>> {
    if let [Expr::Identifier(name)] = columns {
        if name == "*" {
            return Ok((0..table.columns.len()).collect());
        }
    }
    columns
        .iter()
        .map(|expr| resolve_column(table, expr))
        .collect()
}

/// Strict column lookup for a projection or INSERT column-list entry.
fn resolve_column(table: &Table, expr: &Expr) -> Result<usize> {
    let Expr::Identifier(name) = expr else {
        return Err(SqlError::Unsupported(format!(
            "'{}' is not a column name",
            crate::sql::render::render_expression(expr)
        )));
    };
    table
        .column_index(name)
        .ok_or_else(|| SqlError::ColumnNotFound {
            table: table.name.clone(),
            column: name.clone(),
        })
}

// ===========================================================================
// INSERT
// ===========================================================================

fn execute_insert(insert: &InsertStatement, catalog: &mut Catalog) -> Result<StatementResult> {
    // Expressions evaluate without row context, so do it before the
    // mutable table borrow.
    let values: Vec<Value> = insert
        .values
        .iter()
        .map(|expr| evaluate_expression(expr, None))
        .collect::<Result<_>>()?;

    let row = if insert.columns.is_empty() {
        values
    } else {
        let table = lookup(catalog, &insert.table.name)?;
        let indices: Vec<usize> = insert
            .columns
            .iter()
            .map(|expr| resolve_column(table, expr))
            .collect::<Result<_>>()?;
        // Named form: unstated columns stay NULL, surplus values are
        // silently dropped.
        let mut row = vec![Value::Null; table.columns.len()];
        for (slot, value) in indices.into_iter().zip(values) {
            row[slot] = value;
        }
        row
    };

    let table = lookup_mut(catalog, &insert.table.name)?;
    table.add_row(row)?;

    tracing::debug!(table = %insert.table.name, "row inserted");
    Ok(StatementResult::RowsAffected(1))
}

// ===========================================================================
// UPDATE
// ===========================================================================

fn execute_update(update: &UpdateStatement, catalog: &mut Catalog) -> Result<StatementResult> {
    let table = lookup(catalog, &update.table.name)?;

    // SET targets resolve strictly, and the right-hand sides evaluate once
    // per statement with no row context, not once per row.
    let mut assignments = Vec::with_capacity(update.assignments.len());
    for assignment in &update.assignments {
        let index =
            table
                .column_index(&assignment.column)
                .ok_or_else(|| SqlError::ColumnNotFound {
                    table: table.name.clone(),
                    column: assignment.column.clone(),
                })?;
        let value = evaluate_expression(&assignment.value, None)?;
        assignments.push((index, value));
    }

    let matched = match_flags(update.where_clause.as_ref(), table)?;

    let table = lookup_mut(catalog, &update.table.name)?;
    let mut updated = 0;
    for (row, hit) in table.rows.iter_mut().zip(&matched) {
        if *hit {
            for (index, value) in &assignments {
                row[*index] = value.clone();
            }
            updated += 1;
        }
    }

    tracing::debug!(table = %update.table.name, rows = updated, "update applied");
    Ok(StatementResult::RowsAffected(updated))
}

// ===========================================================================
// DELETE
// ===========================================================================

fn execute_delete(delete: &DeleteStatement, catalog: &mut Catalog) -> Result<StatementResult> {
    let table = lookup(catalog, &delete.table.name)?;
    let matched = match_flags(delete.where_clause.as_ref(), table)?;
    let deleted = matched.iter().filter(|&&hit| hit).count();

    let table = lookup_mut(catalog, &delete.table.name)?;
    let mut flags = matched.into_iter();
    // Survivors keep their relative order.
    table.rows.retain(|_| !flags.next().unwrap_or(false));

    tracing::debug!(table = %delete.table.name, rows = deleted, "rows deleted");
    Ok(StatementResult::RowsAffected(deleted))
}

// ===========================================================================
// CREATE TABLE / DROP TABLE
// ===========================================================================

fn execute_create(create: &CreateTableStatement, catalog: &mut Catalog) -> Result<StatementResult> {
    catalog.create_table(&create.table.name, create.columns.clone(), None)?;
    tracing::debug!(table = %create.table.name, "table created");
    Ok(StatementResult::TableCreated(create.table.name.clone()))
}

fn execute_drop(drop: &DropTableStatement, catalog: &mut Catalog) -> Result<StatementResult> {
    catalog.drop_table(&drop.table.name)?;
    tracing::debug!(table = %drop.table.name, "table dropped");
    Ok(StatementResult::TableDropped(drop.table.name.clone()))
}

// ===========================================================================
// Condition & expression evaluation
// ===========================================================================

fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Table> {
    catalog
        .get_table(name)
        .ok_or_else(|| SqlError::TableNotFound(name.to_string()))
}

fn lookup_mut<'a>(catalog: &'a mut Catalog, name: &str) -> Result<&'a mut Table> {
    catalog
        .get_table_mut(name)
        .ok_or_else(|| SqlError::TableNotFound(name.to_string()))
}

/// Evaluate the optional WHERE clause against every row before any
/// mutation happens, so a mid-scan type error leaves the table untouched.
fn match_flags(cond: Option<&Condition>, table: &Table) -> Result<Vec<bool>> {
    table
        .rows
        .iter()
        .map(|row| matches(cond, table, row))
        .collect()
}

fn matches(cond: Option<&Condition>, table: &Table, row: &[Value]) -> Result<bool> {
    match cond {
        Some(cond) => evaluate_condition(cond, table, row),
        None => Ok(true),
    }
}

/// Evaluate a condition against one row. AND and OR short-circuit.
pub fn evaluate_condition(cond: &Condition, table: &Table, row: &[Value]) -> Result<bool> {
    match cond {
        Condition::Logical { left, op, right } => {
            let lhs = evaluate_condition(left, table, row)?;
            match op {
                LogicalOp::And if !lhs => Ok(false),
                LogicalOp::Or if lhs => Ok(true),
                _ => evaluate_condition(right, table, row),
            }
        }
        Condition::Not(inner) => Ok(!evaluate_condition(inner, table, row)?),
        Condition::Comparison { left, op, right } => {
            let lhs = evaluate_expression(left, Some((table, row)))?;
            let rhs = evaluate_expression(right, Some((table, row)))?;
            compare(&lhs, *op, &rhs)
        }
        Condition::Expr(expr) => {
            Ok(evaluate_expression(expr, Some((table, row)))?.is_truthy())
        }
    }
}

fn compare(lhs: &Value, op: CompareOp, rhs: &Value) -> Result<bool> {
    match op {
        CompareOp::Eq => Ok(lhs.loose_eq(rhs)),
        CompareOp::NotEq => Ok(!lhs.loose_eq(rhs)),
        CompareOp::Gt => Ok(lhs.compare(rhs)?.is_gt()),
        CompareOp::Lt => Ok(lhs.compare(rhs)?.is_lt()),
        CompareOp::GtEq => Ok(lhs.compare(rhs)?.is_ge()),
        CompareOp::LtEq => Ok(lhs.compare(rhs)?.is_le()),
    }
}

/// Evaluate an expression, optionally against a row.
///
/// With row context, an identifier naming a column yields that cell;
/// otherwise (or with no context at all) it yields its own text. DOT
/// stringifies both operands and joins them with a literal `.`.
pub fn evaluate_expression(expr: &Expr, context: Option<(&Table, &[Value])>) -> Result<Value> {
    match expr {
        Expr::Identifier(name) => {
            if let Some((table, row)) = context {
                if let Some(index) = table.column_index(name) {
                    return Ok(row[index].clone());
                }
            }
            Ok(Value::Text(name.clone()))
        }
        Expr::Literal(lit) => Ok(literal_value(lit)),
        Expr::Binary { left, op, right } => {
            let lhs = evaluate_expression(left, context)?;
            let rhs = evaluate_expression(right, context)?;
            match op {
                BinaryOp::Dot => Ok(Value::Text(format!("{lhs}.{rhs}"))),
                BinaryOp::Add => lhs.add(&rhs),
                BinaryOp::Sub => lhs.sub(&rhs),
                BinaryOp::Mul => lhs.mul(&rhs),
                BinaryOp::Div => lhs.div(&rhs),
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(v) => Value::Integer(*v),
        Literal::Float(v) => Value::Float(*v),
        Literal::Text(s) => Value::Text(s.clone()),
        Literal::Null => Value::Null,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
