/// Lexical errors.
///
/// Malformed number literals, bad string escapes, unterminated strings and
/// characters that cannot start any token. The lexer always recovers locally
/// and keeps scanning.
pub mod lex_error;
/// Parsing errors.
///
/// An unexpected token at some position of the grammar. The parser abandons
/// the current statement and resumes at the next one.
pub mod parse_error;
/// Runtime errors.
///
/// Division by zero, integer overflow and malformed ranges. These turn the
/// offending expression into the error value instead of aborting evaluation.
pub mod runtime_error;
/// Static type errors.
///
/// Undeclared or redeclared variables and operands of the wrong type. A
/// statement with a type error is never evaluated.
pub mod type_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use type_error::TypeError;

use crate::diagnostics::Stage;

/// Any error that can be recorded in [`crate::diagnostics::Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// The pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Lex(_) => Stage::Lex,
            Self::Parse(_) => Stage::Parse,
            Self::Type(_) => Stage::Type,
            Self::Runtime(_) => Stage::Runtime,
        }
    }
}
