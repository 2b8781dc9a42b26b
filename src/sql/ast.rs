//! Abstract syntax tree definitions for MiniSQL.
//!
//! Every statement parsed by [`super::parser::Parser`] is represented as a
//! tree of the types defined here. The AST is consumed by the executor and
//! by the canonical regenerator in [`super::render`].
//!
//! Column definitions reuse [`crate::catalog::ColumnDef`] directly so the
//! parser, catalog, and executor all share one definition.

use std::fmt;

use crate::catalog::ColumnDef;

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    DropTable(DropTableStatement),
}

/// A `SELECT` statement.
///
/// The column list is a plain expression list; a bare `*` parses as the
/// identifier `*` in first position. Multiple FROM tables and JOIN clauses
/// are carried faithfully in the tree, but the executor only ever consults
/// the first FROM table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub columns: Vec<Expr>,
    pub tables: Vec<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Condition>,
}

/// A table named in a FROM list or JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
}

/// A `JOIN <table> ON <condition>` clause. Parsed, never executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Condition,
}

/// An `INSERT` statement. An empty `columns` list means the positional form
/// (`INSERT INTO t VALUES (...)`).
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: TableRef,
    pub columns: Vec<Expr>,
    pub values: Vec<Expr>,
}

/// An `UPDATE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Condition>,
}

/// One `column = expression` pair in an UPDATE's SET list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: TableRef,
    pub where_clause: Option<Condition>,
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table: TableRef,
    pub columns: Vec<ColumnDef>,
}

/// A `DROP TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    pub table: TableRef,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A WHERE/ON condition tree.
///
/// Chained boolean connectives are right-associative: `a AND b AND c` parses
/// as `a AND (b AND c)`, because the grammar's trailing `(AND|OR) condition`
/// production recurses on the whole condition rule. The left operand of a
/// [`Condition::Logical`] is therefore never itself a `Logical` in any tree
/// the parser produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A leaf comparison, e.g. `age > 25`.
    Comparison {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    /// `left AND right` / `left OR right`.
    Logical {
        left: Box<Condition>,
        op: LogicalOp,
        right: Box<Condition>,
    },
    /// Negation. The grammar has no production for it, but the evaluator
    /// supports trees built through the API.
    Not(Box<Condition>),
    /// A bare expression standing where a condition is expected; evaluated
    /// via truthiness.
    Expr(Expr),
}

/// Comparison operators usable in a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
        };
        f.write_str(s)
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        })
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare name, resolved as a column reference when a row context is
    /// available.
    Identifier(String),
    Literal(Literal),
    /// A binary node. The parser only produces [`BinaryOp::Dot`] (the
    /// `table.column` shape); the arithmetic operators are evaluated when
    /// present in a tree but have no grammar production.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

/// Binary operators an [`Expr::Binary`] node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Dot,
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Dot => ".",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        })
    }
}

/// A literal value as written in the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}
