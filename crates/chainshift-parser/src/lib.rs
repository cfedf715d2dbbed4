pub mod ast;
pub mod parser;
pub mod token;

pub use ast::{Expr, ExprKind, Program, Property, Stmt};
pub use parser::{parse, parse_expr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected character '{ch}' on line {line}")]
    UnexpectedChar { ch: char, line: usize },
    #[error("Unterminated string literal starting on line {line}")]
    UnterminatedString { line: usize },
    #[error("Unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },
    #[error("Unexpected token '{found}' on line {line}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: &'static str,
    },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
}
