//! The staged error surfaced by compile calls.

use glint_glsl::CodeGenError;
use glint_parser::{LexError, ParseError, SyntaxError};

/// Any failure of a compile call, tagged with the stage that raised it.
///
/// The first error terminates the compile and is returned unchanged;
/// nothing partial is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("[Lexing Error] {0}")]
    Lexical(#[from] LexError),

    #[error("[Parsing Error] {0}")]
    Syntax(#[from] SyntaxError),

    /// Reserved. The optimizer has no raising path today; the variant keeps
    /// the stage tagging exhaustive for callers that match on stages.
    #[error("[Optimization Error] {0}")]
    Optimization(String),

    #[error("[Code Generation Error] {0}")]
    CodeGen(#[from] CodeGenError),

    /// Source file could not be read. File access sits outside the staged
    /// pipeline, so it carries no stage prefix.
    #[error("failed to read shader source: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(e) => Self::Lexical(e),
            ParseError::Syntax(e) => Self::Syntax(e),
        }
    }
}
