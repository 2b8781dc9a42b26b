//! Canonical SQL regeneration from the AST.
//!
//! [`render`] turns a parsed [`Statement`] back into a single-line,
//! normalized SQL string: upper-case keywords, single spaces, `", "`
//! separated lists, `'`-quoted strings, and no trailing semicolon.
//! Whitespace and comments from the source are gone, so rendering is how
//! callers get the canonical spelling of a query.
//!
//! No parentheses are ever emitted. Connective chains parse
//! right-associatively and the renderer emits them in source order, so
//! re-parsing rendered text rebuilds the identical tree and rendering is
//! idempotent.

use crate::sql::ast::*;
use crate::types::format_float;

/// Render a statement as canonical SQL text.
pub fn render(stmt: &Statement) -> String {
    match stmt {
        Statement::Select(select) => render_select(select),
        Statement::Insert(insert) => render_insert(insert),
        Statement::Update(update) => render_update(update),
        Statement::Delete(delete) => render_delete(delete),
        Statement::CreateTable(create) => render_create(create),
        Statement::DropTable(drop) => format!("DROP TABLE {}", drop.table.name),
    }
}

fn render_select(select: &SelectStatement) -> String {
    let mut sql = format!(
        "SELECT {} FROM {}",
        render_column_list(&select.columns),
        join_list(select.tables.iter().map(|t| t.name.clone()))
    );
    for join in &select.joins {
        sql.push_str(&format!(
            " JOIN {} ON {}",
            join.table.name,
            render_condition(&join.on)
        ));
    }
    if let Some(cond) = &select.where_clause {
        sql.push_str(&format!(" WHERE {}", render_condition(cond)));
    }
    sql
}

fn render_insert(insert: &InsertStatement) -> String {
    let mut sql = format!("INSERT INTO {}", insert.table.name);
    if !insert.columns.is_empty() {
        sql.push_str(&format!(" ({})", render_column_list(&insert.columns)));
    }
    sql.push_str(&format!(
        " VALUES ({})",
        join_list(insert.values.iter().map(render_expression))
    ));
    sql
}

fn render_update(update: &UpdateStatement) -> String {
    let mut sql = format!(
        "UPDATE {} SET {}",
        update.table.name,
        join_list(
            update
                .assignments
                .iter()
                .map(|a| format!("{} = {}", a.column, render_expression(&a.value)))
        )
    );
    if let Some(cond) = &update.where_clause {
        sql.push_str(&format!(" WHERE {}", render_condition(cond)));
    }
    sql
}

fn render_delete(delete: &DeleteStatement) -> String {
    let mut sql = format!("DELETE FROM {}", delete.table.name);
    if let Some(cond) = &delete.where_clause {
        sql.push_str(&format!(" WHERE {}", render_condition(cond)));
    }
    sql
}

fn render_create(create: &CreateTableStatement) -> String {
    format!(
        "CREATE TABLE {} ({})",
        create.table.name,
        join_list(
            create
                .columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.column_type))
        )
    )
}

/// An empty column list renders as `*` (an UPDATE with no assignments is
/// unparseable, so only SELECT/INSERT lists reach this).
fn render_column_list(columns: &[Expr]) -> String {
    if columns.is_empty() {
        return "*".into();
    }
    join_list(columns.iter().map(render_expression))
}

pub fn render_condition(cond: &Condition) -> String {
    match cond {
        Condition::Comparison { left, op, right } => format!(
            "{} {op} {}",
            render_expression(left),
            render_expression(right)
        ),
        Condition::Logical { left, op, right } => format!(
            "{} {op} {}",
            render_condition(left),
            render_condition(right)
        ),
        Condition::Not(inner) => format!("NOT {}", render_condition(inner)),
        Condition::Expr(expr) => render_expression(expr),
    }
}

pub fn render_expression(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(name) => name.clone(),
        Expr::Literal(lit) => render_literal(lit),
        Expr::Binary { left, op, right } => format!(
            "{} {op} {}",
            render_expression(left),
            render_expression(right)
        ),
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Integer(v) => v.to_string(),
        Literal::Float(v) => format_float(*v),
        Literal::Text(s) => format!("'{s}'"),
        Literal::Null => "NULL".into(),
    }
}

fn join_list(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::Parser;

    fn roundtrip(input: &str) -> String {
        render(&Parser::parse(input).unwrap())
    }

    #[test]
    fn normalizes_case_whitespace_and_semicolon() {
        assert_eq!(
            roundtrip("select  *\nfrom users ;"),
            "SELECT * FROM users"
        );
    }

    #[test]
    fn select_with_columns_and_where() {
        assert_eq!(
            roundtrip("SELECT id,name FROM users WHERE age>=25"),
            "SELECT id, name FROM users WHERE age >= 25"
        );
    }

    #[test]
    fn dotted_column_renders_with_spaced_dot() {
        assert_eq!(
            roundtrip("SELECT users.name FROM users"),
            "SELECT users . name FROM users"
        );
    }

    #[test]
    fn join_clause() {
        assert_eq!(
            roundtrip("SELECT * FROM o JOIN u ON o.uid = u.id"),
            "SELECT * FROM o JOIN u ON o . uid = u . id"
        );
    }

    #[test]
    fn logical_chain_renders_without_parentheses() {
        assert_eq!(
            roundtrip("SELECT * FROM t WHERE a = 1 AND b = 2 OR c = 3"),
            "SELECT * FROM t WHERE a = 1 AND b = 2 OR c = 3"
        );
    }

    #[test]
    fn insert_positional_and_named() {
        assert_eq!(
            roundtrip("insert into users values(1,'John',null)"),
            "INSERT INTO users VALUES (1, 'John', NULL)"
        );
        assert_eq!(
            roundtrip("INSERT INTO users(id,name) VALUES(1,'John')"),
            "INSERT INTO users (id, name) VALUES (1, 'John')"
        );
    }

    #[test]
    fn update_and_delete() {
        assert_eq!(
            roundtrip("update users set age=31 where id=1"),
            "UPDATE users SET age = 31 WHERE id = 1"
        );
        assert_eq!(roundtrip("delete from users"), "DELETE FROM users");
    }

    #[test]
    fn create_and_drop() {
        assert_eq!(
            roundtrip("create table t(a int,b text,c float,d date)"),
            "CREATE TABLE t (a INT, b TEXT, c FLOAT, d DATE)"
        );
        assert_eq!(roundtrip("drop table t;"), "DROP TABLE t");
    }

    #[test]
    fn whole_floats_keep_a_fractional_digit() {
        assert_eq!(
            roundtrip("SELECT * FROM t WHERE x = 2.0"),
            "SELECT * FROM t WHERE x = 2.0"
        );
        assert_eq!(
            roundtrip("SELECT * FROM t WHERE x = 2.5"),
            "SELECT * FROM t WHERE x = 2.5"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let inputs = [
            "select a, b from t1, t2 where a != 'x' or b <= 3.5 and c = null",
            "insert into t (a) values (1)",
            "update t set a = 1, b = 'two' where c > 0",
            "select * from o join u on o.uid = u.id where active = 1",
        ];
        for input in inputs {
            let once = roundtrip(input);
            let twice = roundtrip(&once);
            assert_eq!(once, twice, "for input: {input}");
        }
    }
}
