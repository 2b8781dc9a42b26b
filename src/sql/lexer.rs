//! Hand-written SQL tokenizer for MiniSQL.
//!
//! The [`Lexer`] walks a query string one character at a time and produces
//! [`Token`]s carrying their kind, original lexeme, and 1-based line/column
//! of the token's first character. It is case-insensitive for keywords.
//!
//! Lexical failures never abort tokenization: an unrecognized character, a
//! lone `!`, or an unterminated string literal each surface as a token of
//! kind [`TokenKind::Error`] carrying the offending text, and the parser
//! rejects such tokens when it reaches them.

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // -----------------------------------------------------------------------
    // Keywords
    // -----------------------------------------------------------------------
    Select,
    From,
    Where,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,
    Table,
    Drop,
    Join,
    On,
    And,
    Or,
    Not,
    Null,
    Int,
    Text,
    Float,
    Date,

    // -----------------------------------------------------------------------
    // Operators
    // -----------------------------------------------------------------------
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,

    // -----------------------------------------------------------------------
    // Punctuation
    // -----------------------------------------------------------------------
    Comma,
    Semicolon,
    LeftParen,
    RightParen,
    Dot,

    // -----------------------------------------------------------------------
    // Literals & other
    // -----------------------------------------------------------------------
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Eof,
    Error,
}

/// A single token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The original text of the token. For string literals this is the
    /// interior text without the quotes; for Eof it is empty.
    pub lexeme: String,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 1-based column of the token's first character.
    pub column: u32,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    // The input `word` is already lower-cased by the caller.
    match word {
        "select" => Some(TokenKind::Select),
        "from" => Some(TokenKind::From),
        "where" => Some(TokenKind::Where),
        "insert" => Some(TokenKind::Insert),
        "into" => Some(TokenKind::Into),
        "values" => Some(TokenKind::Values),
        "update" => Some(TokenKind::Update),
        "set" => Some(TokenKind::Set),
        "delete" => Some(TokenKind::Delete),
        "create" => Some(TokenKind::Create),
        "table" => Some(TokenKind::Table),
        "drop" => Some(TokenKind::Drop),
        "join" => Some(TokenKind::Join),
        "on" => Some(TokenKind::On),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        "null" => Some(TokenKind::Null),
        "int" => Some(TokenKind::Int),
        "text" => Some(TokenKind::Text),
        "float" => Some(TokenKind::Float),
        "date" => Some(TokenKind::Date),
        _ => None,
    }
}

/// A streaming tokenizer over a query string.
///
/// Call [`Lexer::next_token`] repeatedly; after the input is exhausted it
/// returns an [`TokenKind::Eof`] token on every subsequent call.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, including the terminating Eof token.
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    // -- helpers ------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character only if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                // Line comment: '#' through end of line or end of input.
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // -- main scanner -------------------------------------------------------

    /// Produce the next token, skipping any leading whitespace and comments.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;

        let ch = match self.peek() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, "", line, column),
        };

        if ch.is_alphabetic() || ch == '_' {
            return self.identifier_or_keyword(line, column);
        }
        if ch.is_ascii_digit() {
            return self.number(line, column);
        }
        if ch == '\'' || ch == '"' {
            return self.string(ch, line, column);
        }

        self.advance();
        let kind = match ch {
            '=' => TokenKind::Eq,
            '>' => {
                if self.eat('=') {
                    return Token::new(TokenKind::GtEq, ">=", line, column);
                }
                TokenKind::Gt
            }
            '<' => {
                if self.eat('=') {
                    return Token::new(TokenKind::LtEq, "<=", line, column);
                }
                TokenKind::Lt
            }
            '!' => {
                if self.eat('=') {
                    return Token::new(TokenKind::NotEq, "!=", line, column);
                }
                // A lone '!' is not a valid operator.
                TokenKind::Error
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '.' => TokenKind::Dot,
            _ => TokenKind::Error,
        };
        Token::new(kind, ch.to_string(), line, column)
    }

    // -- token readers ------------------------------------------------------

    fn identifier_or_keyword(&mut self, line: u32, column: u32) -> Token {
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = keyword_kind(&lexeme.to_lowercase()).unwrap_or(TokenKind::Identifier);
        Token::new(kind, lexeme, line, column)
    }

    fn number(&mut self, line: u32, column: u32) -> Token {
        let mut lexeme = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else if c == '.' {
                // A second decimal point ends the number; it is left in the
                // stream and becomes a Dot token.
                if is_float {
                    break;
                }
                is_float = true;
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        Token::new(kind, lexeme, line, column)
    }

    fn string(&mut self, quote: char, line: u32, column: u32) -> Token {
        self.advance(); // opening quote
        let mut lexeme = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    return Token::new(TokenKind::StringLiteral, lexeme, line, column);
                }
                Some(c) => {
                    lexeme.push(c);
                    self.advance();
                }
                // End of input before the closing quote.
                None => return Token::new(TokenKind::Error, lexeme, line, column),
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::tokenize(input)
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("select FROM Where"),
            vec![
                TokenKind::Select,
                TokenKind::From,
                TokenKind::Where,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn keyword_lexeme_preserves_original_case() {
        let tokens = lex("SeLeCt");
        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert_eq!(tokens[0].lexeme, "SeLeCt");
    }

    #[test]
    fn identifiers() {
        let tokens = lex("my_table user_id123 _x");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "my_table");
        assert_eq!(tokens[1].lexeme, "user_id123");
        assert_eq!(tokens[2].lexeme, "_x");
    }

    #[test]
    fn integer_and_float_literals() {
        let tokens = lex("42 3.14 7.");
        assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[1].lexeme, "3.14");
        assert_eq!(tokens[2].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[2].lexeme, "7.");
    }

    #[test]
    fn second_decimal_point_ends_the_number() {
        let tokens = lex("1.2.3");
        assert_eq!(tokens[0].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[0].lexeme, "1.2");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[2].lexeme, "3");
    }

    #[test]
    fn string_literals_either_quote_style() {
        let tokens = lex("'hello' \"world\"");
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "hello");
        assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].lexeme, "world");
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = lex("'oops");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "oops");
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("= > < >= <= != + - * /"),
            vec![
                TokenKind::Eq,
                TokenKind::Gt,
                TokenKind::Lt,
                TokenKind::GtEq,
                TokenKind::LtEq,
                TokenKind::NotEq,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lone_bang_is_an_error_token() {
        let tokens = lex("a ! b");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "!");
    }

    #[test]
    fn unrecognized_character_is_an_error_token() {
        let tokens = lex("a @ b");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "@");
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds(", ; ( ) ."),
            vec![
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Dot,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn line_comments() {
        let tokens = lex("SELECT # trailing comment\n42");
        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert_eq!(tokens[1].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn consecutive_comment_lines() {
        let tokens = lex("# one\n# two\nSELECT");
        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn positions_are_one_based_token_starts() {
        // "age > 30": columns 1, 5, 7, then Eof at 9.
        let tokens = lex("age > 30");
        assert_eq!(tokens[0].lexeme, "age");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!(tokens[1].kind, TokenKind::Gt);
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!(tokens[2].lexeme, "30");
        assert_eq!((tokens[2].line, tokens[2].column), (1, 7));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
        assert_eq!((tokens[3].line, tokens[3].column), (1, 9));
    }

    #[test]
    fn two_char_operator_reports_start_column() {
        let tokens = lex("a >= 1");
        assert_eq!(tokens[1].kind, TokenKind::GtEq);
        assert_eq!(tokens[1].column, 3);
    }

    #[test]
    fn newline_resets_column() {
        let tokens = lex("a\nbb");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn empty_input() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn full_select_statement() {
        assert_eq!(
            kinds("SELECT id, name FROM users WHERE age > 18;"),
            vec![
                TokenKind::Select,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::From,
                TokenKind::Identifier,
                TokenKind::Where,
                TokenKind::Identifier,
                TokenKind::Gt,
                TokenKind::IntegerLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn type_keywords() {
        assert_eq!(
            kinds("INT TEXT FLOAT DATE"),
            vec![
                TokenKind::Int,
                TokenKind::Text,
                TokenKind::Float,
                TokenKind::Date,
                TokenKind::Eof
            ]
        );
    }
}
