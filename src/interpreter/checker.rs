/// The statement consumer that runs the checks.
///
/// Owns the global scope and the variable arena, checks statements and
/// forwards the ones that pass.
pub mod core;

/// Expression typing rules.
///
/// One exhaustive match over all expression kinds: computes each type,
/// resolves variable references and declares lambda parameters.
pub mod expr;

/// Lexical scopes.
///
/// A chain of name-to-variable frames linked to their enclosing frame.
pub mod scope;

pub use self::{
    core::{CheckResult, Rejected, TypeChecker},
    scope::Scope,
};
