//! Recursive-descent SQL parser for MiniSQL.
//!
//! The parser holds the [`Lexer`] and exactly one token of lookahead,
//! pulled eagerly at construction. The entry point is [`Parser::parse`],
//! which parses a single statement, consumes an optional trailing
//! semicolon, and requires the input to end there; callers with a batch of
//! statements split it beforehand.
//!
//! Any failure aborts the whole statement: there is no error recovery and
//! no partial AST. Error-kind tokens produced by the lexer (unrecognized
//! characters, unterminated strings) become syntax errors the moment the
//! parser reaches them.
//!
//! One grammar quirk is deliberate: the trailing `(AND|OR) condition`
//! production of the condition rule recurses on the whole rule, so chained
//! connectives associate to the right (`a AND b OR c` is `a AND (b OR c)`).

use crate::catalog::{ColumnDef, ColumnType};
use crate::error::{Result, SqlError};
use crate::sql::ast::*;
use crate::sql::lexer::{Lexer, Token, TokenKind};

/// A single-lookahead recursive-descent parser over a token stream.
pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    /// Parse one statement from `input`, requiring nothing but an optional
    /// `;` after it.
    pub fn parse(input: &str) -> Result<Statement> {
        let mut parser = Parser::new(input);
        let stmt = parser.parse_statement()?;
        parser.finish()?;
        Ok(stmt)
    }

    pub fn new(input: &str) -> Parser {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser { lexer, current }
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    /// Replace the lookahead with the next token and return the old one.
    fn advance(&mut self) -> Token {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    /// Advance past a token of the expected kind, or fail naming expected
    /// vs. actual kind and the token's position.
    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.current.kind == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("expected {expected:?}")))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        if self.current.kind == TokenKind::Identifier {
            Ok(self.advance().lexeme)
        } else {
            Err(self.unexpected(&format!("expected {what}")))
        }
    }

    /// Build a syntax error at the lookahead token. Error-kind tokens get a
    /// lexical message instead of a grammar one.
    fn unexpected(&self, wanted: &str) -> SqlError {
        let message = if self.current.kind == TokenKind::Error {
            format!("unrecognized input '{}'", self.current.lexeme)
        } else {
            format!("{wanted}, got {:?}", self.current.kind)
        };
        SqlError::Syntax {
            message,
            line: self.current.line,
            column: self.current.column,
        }
    }

    /// Consume an optional trailing semicolon and require end of input.
    fn finish(&mut self) -> Result<()> {
        if self.current.kind == TokenKind::Semicolon {
            self.advance();
        }
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("expected end of statement"));
        }
        Ok(())
    }

    // =======================================================================
    // Statement dispatch
    // =======================================================================

    pub fn parse_statement(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Select => self.parse_select(),
            TokenKind::Insert => self.parse_insert(),
            TokenKind::Update => self.parse_update(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::Create => self.parse_create(),
            TokenKind::Drop => self.parse_drop(),
            _ => Err(self.unexpected("expected a statement keyword")),
        }
    }

    // =======================================================================
    // SELECT
    // =======================================================================

    fn parse_select(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Select)?;
        let columns = self.parse_column_list()?;

        self.expect(TokenKind::From)?;
        let tables = self.parse_table_list()?;

        let mut joins = Vec::new();
        while self.current.kind == TokenKind::Join {
            joins.push(self.parse_join()?);
        }

        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Select(SelectStatement {
            columns,
            tables,
            joins,
            where_clause,
        }))
    }

    /// `'*' | expression (',' expression)*`, shared by SELECT projections
    /// and INSERT column lists. A bare `*` becomes the identifier `*`.
    fn parse_column_list(&mut self) -> Result<Vec<Expr>> {
        if self.current.kind == TokenKind::Star {
            self.advance();
            return Ok(vec![Expr::Identifier("*".into())]);
        }
        let mut columns = vec![self.parse_expression()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            columns.push(self.parse_expression()?);
        }
        Ok(columns)
    }

    fn parse_table_list(&mut self) -> Result<Vec<TableRef>> {
        let mut tables = vec![self.parse_table_ref()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            tables.push(self.parse_table_ref()?);
        }
        Ok(tables)
    }

    fn parse_table_ref(&mut self) -> Result<TableRef> {
        let name = self.expect_identifier("expected table name")?;
        Ok(TableRef { name })
    }

    fn parse_join(&mut self) -> Result<Join> {
        self.expect(TokenKind::Join)?;
        let table = self.parse_table_ref()?;
        self.expect(TokenKind::On)?;
        let on = self.parse_condition()?;
        Ok(Join { table, on })
    }

    fn parse_optional_where(&mut self) -> Result<Option<Condition>> {
        if self.current.kind == TokenKind::Where {
            self.advance();
            Ok(Some(self.parse_condition()?))
        } else {
            Ok(None)
        }
    }

    // =======================================================================
    // Conditions & expressions
    // =======================================================================

    /// `expression (compareOp expression)? ((AND|OR) condition)*`
    ///
    /// The recursion on the full condition rule in the connective tail is
    /// what makes chains right-associative; the wrap loop below can only
    /// ever run its body once per level because the recursive call consumes
    /// the rest of the condition.
    fn parse_condition(&mut self) -> Result<Condition> {
        let left = self.parse_expression()?;

        let mut node = if let Some(op) = compare_op(self.current.kind) {
            self.advance();
            let right = self.parse_expression()?;
            Condition::Comparison { left, op, right }
        } else {
            Condition::Expr(left)
        };

        while let Some(op) = logical_op(self.current.kind) {
            self.advance();
            let right = self.parse_condition()?;
            node = Condition::Logical {
                left: Box::new(node),
                op,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    /// `IDENTIFIER ('.' IDENTIFIER)? | literal | '(' expression ')'`
    fn parse_expression(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                if self.current.kind == TokenKind::Dot {
                    self.advance();
                    let column = self.expect_identifier("expected column name after '.'")?;
                    return Ok(Expr::Binary {
                        left: Box::new(Expr::Identifier(name)),
                        op: BinaryOp::Dot,
                        right: Box::new(Expr::Identifier(column)),
                    });
                }
                Ok(Expr::Identifier(name))
            }
            TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::Null => self.parse_literal().map(Expr::Literal),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        match self.current.kind {
            TokenKind::IntegerLiteral => {
                let tok = self.advance();
                tok.lexeme.parse::<i64>().map(Literal::Integer).map_err(|_| {
                    SqlError::Syntax {
                        message: format!("invalid integer literal '{}'", tok.lexeme),
                        line: tok.line,
                        column: tok.column,
                    }
                })
            }
            TokenKind::FloatLiteral => {
                let tok = self.advance();
                tok.lexeme.parse::<f64>().map(Literal::Float).map_err(|_| {
                    SqlError::Syntax {
                        message: format!("invalid float literal '{}'", tok.lexeme),
                        line: tok.line,
                        column: tok.column,
                    }
                })
            }
            TokenKind::StringLiteral => Ok(Literal::Text(self.advance().lexeme)),
            TokenKind::Null => {
                self.advance();
                Ok(Literal::Null)
            }
            _ => Err(self.unexpected("expected a literal")),
        }
    }

    // =======================================================================
    // INSERT
    // =======================================================================

    fn parse_insert(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Insert)?;
        self.expect(TokenKind::Into)?;
        let table = self.parse_table_ref()?;

        let columns = if self.current.kind == TokenKind::LeftParen {
            self.advance();
            let columns = self.parse_column_list()?;
            self.expect(TokenKind::RightParen)?;
            columns
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Values)?;
        self.expect(TokenKind::LeftParen)?;
        let mut values = vec![self.parse_expression()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            values.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RightParen)?;

        Ok(Statement::Insert(InsertStatement {
            table,
            columns,
            values,
        }))
    }

    // =======================================================================
    // UPDATE
    // =======================================================================

    fn parse_update(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Update)?;
        let table = self.parse_table_ref()?;
        self.expect(TokenKind::Set)?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            assignments.push(self.parse_assignment()?);
        }

        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Update(UpdateStatement {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.expect_identifier("expected column name")?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;
        Ok(Assignment { column, value })
    }

    // =======================================================================
    // DELETE
    // =======================================================================

    fn parse_delete(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Delete)?;
        self.expect(TokenKind::From)?;
        let table = self.parse_table_ref()?;
        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Delete(DeleteStatement {
            table,
            where_clause,
        }))
    }

    // =======================================================================
    // CREATE TABLE / DROP TABLE
    // =======================================================================

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Create)?;
        self.expect(TokenKind::Table)?;
        let table = self.parse_table_ref()?;

        self.expect(TokenKind::LeftParen)?;
        let mut columns = vec![self.parse_column_def()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            columns.push(self.parse_column_def()?);
        }
        self.expect(TokenKind::RightParen)?;

        Ok(Statement::CreateTable(CreateTableStatement {
            table,
            columns,
        }))
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.expect_identifier("expected column name")?;
        let column_type = match self.current.kind {
            TokenKind::Int => ColumnType::Int,
            TokenKind::Text => ColumnType::Text,
            TokenKind::Float => ColumnType::Float,
            TokenKind::Date => ColumnType::Date,
            _ => return Err(self.unexpected("expected a column type")),
        };
        self.advance();
        Ok(ColumnDef::new(name, column_type))
    }

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Drop)?;
        self.expect(TokenKind::Table)?;
        let table = self.parse_table_ref()?;
        Ok(Statement::DropTable(DropTableStatement { table }))
    }
}

fn compare_op(kind: TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Eq => Some(CompareOp::Eq),
        TokenKind::NotEq => Some(CompareOp::NotEq),
        TokenKind::Gt => Some(CompareOp::Gt),
        TokenKind::Lt => Some(CompareOp::Lt),
        TokenKind::GtEq => Some(CompareOp::GtEq),
        TokenKind::LtEq => Some(CompareOp::LtEq),
        _ => None,
    }
}

fn logical_op(kind: TokenKind) -> Option<LogicalOp> {
    match kind {
        TokenKind::And => Some(LogicalOp::And),
        TokenKind::Or => Some(LogicalOp::Or),
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
