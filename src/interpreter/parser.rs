/// Parser state and token plumbing.
///
/// Owns the lexer and the diagnostics, provides one token of lookahead and
/// runs the statement loop including error recovery.
pub mod core;

/// Statement parsing.
///
/// Recognizes `var`, `out` and `print` statements.
pub mod statement;

/// Binary operator parsing.
///
/// Precedence climbing over `+ - * / ^`.
pub mod binary;

/// Primary expression parsing.
///
/// Literals, variable references, parenthesized expressions, ranges and the
/// `map` and `reduce` forms.
pub mod primary;

pub use self::core::{Abandoned, ParseResult, Parser};
