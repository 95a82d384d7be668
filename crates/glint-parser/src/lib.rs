//! Front end for the glint shader DSL.
//!
//! [`tokenize`] turns source text into a token sequence; [`Parser`] turns
//! tokens into a [`glint_ast::Program`]. [`parse`] chains the two for
//! callers that do not need per-stage timing.

pub mod lexer;
pub mod parser;

pub use lexer::{LexError, Token, TokenKind, tokenize};
pub use parser::{Parser, SyntaxError};

use glint_ast::Program;

/// Either kind of front-end failure.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Tokenize and parse a full source buffer.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).parse()?)
}
