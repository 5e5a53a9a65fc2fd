//! # seqcalc
//!
//! seqcalc is an interpreter for a small expression language with variables,
//! integer and float arithmetic, closed integer ranges and data-parallel
//! `map` and `reduce` over sequences.
//!
//! Source text flows through a pipeline of stages: the lexer produces tokens,
//! the parser builds one statement at a time, the type checker resolves names
//! and types, and the interpreter evaluates what passed. Every stage reports
//! problems to one shared [`Diagnostics`] log and keeps going, so a single run
//! always reaches the end of the input.
//!
//! ```
//! let evaluation = seqcalc::evaluate("var x = {1, 4}\nout reduce(x, 0, a b -> a + b)");
//!
//! assert!(evaluation.diagnostics.is_empty());
//! assert_eq!(evaluation.rendered_output(), ["10"]);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::collections::BTreeMap;

use crate::{
    diagnostics::{Diagnostic, Diagnostics, SourceLoc},
    interpreter::{
        checker::TypeChecker,
        consumer::StmtConsumer,
        evaluator::{Interpreter, Options},
        lexer::{Lexer, Token, TokenKind},
        parser::Parser,
        value::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression trees, the static type
/// lattice and the variables the type checker declares. The AST is built by
/// the parser, annotated by the type checker and walked by the evaluator.
///
/// # Responsibilities
/// - Defines statement and expression types for all language constructs.
/// - Attaches source spans to every node for error reporting.
/// - Holds the write-once type and variable slots the type checker fills.
pub mod ast;
/// Source locations and the shared error log.
///
/// Every stage writes into the same [`Diagnostics`]; entries carry a span, the
/// typed error and an optional fix-it.
pub mod diagnostics;
/// Provides unified error types for all pipeline stages.
///
/// This module defines all errors that can be reported while lexing, parsing,
/// type checking or evaluating code. The `Display` form of each error is the
/// message shown to the user.
///
/// # Responsibilities
/// - Defines one error enum per stage.
/// - Unifies them in [`error::Error`] for the diagnostics log.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module holds every pipeline stage from the scanner to the evaluator,
/// and the runtime values they produce.
///
/// # Responsibilities
/// - Coordinates all core components: scanner, lexer, parser, type checker,
///   evaluator and value types.
/// - Chains the stages after the parser as statement consumers.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides conversions between integer and floating-point types,
/// range arithmetic that cannot overflow, and float formatting.
pub mod util;
/// Checking a run against expectations embedded in the source.
///
/// Reads expected-error directives and `CHECK:` patterns from comments and
/// compares them with the diagnostics and output of a run.
pub mod verifier;

/// The result of evaluating a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Everything reported while lexing, parsing, checking and evaluating, in
    /// the order it was reported.
    pub diagnostics: Vec<Diagnostic>,
    /// One value per `out` and `print` statement that passed the type checker,
    /// keyed by the start of the statement.
    pub output:      BTreeMap<SourceLoc, Value>,
}

impl Evaluation {
    /// The diagnostic messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(Diagnostic::message).collect()
    }

    /// The output values in source order, as they are printed.
    #[must_use]
    pub fn rendered_output(&self) -> Vec<String> {
        self.output.values().map(ToString::to_string).collect()
    }
}

/// Evaluates `source` with default [`Options`].
///
/// # Examples
/// ```
/// use seqcalc::{evaluate, interpreter::value::Value};
///
/// let evaluation = evaluate("out 1/2\nout 1/0");
/// let values: Vec<_> = evaluation.output.values().cloned().collect();
///
/// assert_eq!(values, [Value::float(0.5), Value::Error]);
/// assert_eq!(evaluation.messages(), ["Division by 0"]);
/// ```
#[must_use]
pub fn evaluate(source: &str) -> Evaluation {
    evaluate_with(source, &Options::default())
}

/// Evaluates `source`, splitting bulk operators across `options.workers`.
///
/// Apart from `reduce` lambdas that are not associative, the result does not
/// depend on the number of workers.
#[must_use]
#[tracing::instrument(level = "debug", skip_all, fields(workers = options.workers.get()))]
pub fn evaluate_with(source: &str, options: &Options) -> Evaluation {
    let mut interpreter = Interpreter::new(options);
    let diagnostics = type_check(source, &mut interpreter);

    Evaluation { diagnostics: diagnostics.into_vec(),
                 output:      interpreter.into_output(), }
}

/// Parses `source` and hands every statement to `consumer` unchecked.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str, consumer: &mut impl StmtConsumer) -> Diagnostics {
    Parser::new(source).parse(consumer)
}

/// Parses and type checks `source`, handing every statement that passes to
/// `consumer`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(source: &str, consumer: &mut impl StmtConsumer) -> Diagnostics {
    let mut checker = TypeChecker::new(consumer);
    Parser::new(source).parse(&mut checker)
}

/// Lexes all of `source`, comments and error tokens included.
///
/// The last token is always [`TokenKind::Eof`].
///
/// # Examples
/// ```
/// use seqcalc::{interpreter::lexer::TokenKind, lex};
///
/// let kinds: Vec<_> = lex("out x-1 # done").iter().map(|token| token.kind).collect();
///
/// assert_eq!(kinds,
///            [TokenKind::Identifier,
///             TokenKind::Identifier,
///             TokenKind::Sub,
///             TokenKind::IntLiteral,
///             TokenKind::Comment,
///             TokenKind::Eof]);
/// ```
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    lex_with_diagnostics(source).0
}

/// Like [`lex`], also returning the lexical errors.
#[must_use]
pub fn lex_with_diagnostics(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(&mut diagnostics);
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return (tokens, diagnostics);
        }
    }
}
