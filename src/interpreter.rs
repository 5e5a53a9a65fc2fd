/// The scanner module reads source text one character at a time.
///
/// It provides a single character of lookahead and tracks the line and column
/// of the next character, treating `\r\n` as one line break.
pub mod scanner;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer pulls characters from the scanner and produces tokens on demand,
/// each with a kind, an optional payload and its source span. This is the
/// first stage of the pipeline.
///
/// # Responsibilities
/// - Recognizes identifiers, number and string literals, operators, comments
///   and the end of input.
/// - Folds a leading `-` into a number literal where it cannot be a
///   subtraction.
/// - Reports lexical errors and recovers locally with a best-effort token.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser consumes the tokens produced by the lexer with one token of
/// lookahead and hands every complete top-level statement to a
/// [`consumer::StmtConsumer`].
///
/// # Responsibilities
/// - Parses `var`, `out` and `print` statements and the expression grammar,
///   using precedence climbing for binary operators.
/// - Reports syntax errors with their location and an optional fix-it.
/// - Skips to the next statement after an error.
pub mod parser;
/// Statement consumers.
///
/// Declares the trait every pipeline stage after the parser implements and an
/// AST printer for inspecting parser and type checker output.
pub mod consumer;
/// The checker module resolves names and infers types.
///
/// Each statement is checked on its own; the ones that pass are forwarded to
/// the next consumer, the others are dropped.
///
/// # Responsibilities
/// - Resolves every variable reference to a declared variable, honoring
///   lambda parameter shadowing.
/// - Assigns a type to every expression.
/// - Rejects redeclarations, undeclared names and operands of the wrong type.
pub mod checker;
/// The evaluator module executes checked statements and computes results.
///
/// The evaluator walks the typed AST, evaluates expressions to values and
/// records the output of `out` and `print` statements. Ranges, `map` and
/// `reduce` run on several workers at once.
///
/// # Responsibilities
/// - Evaluates arithmetic with int to float promotion.
/// - Reports runtime errors such as division by zero or inverted ranges and
///   continues with the error value.
/// - Splits bulk operators into disjoint slices and joins them
///   deterministically.
pub mod evaluator;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values an expression can produce: ints, floats,
/// strings, sequences and the error value. It also provides the pool bulk
/// operators draw sequence buffers from.
pub mod value;
