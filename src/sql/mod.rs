//! SQL front end: lexer, AST, parser, and canonical text regeneration.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
