/// Core evaluation logic and interpreter state.
///
/// Contains the statement-level interpreter, the per-thread activation with
/// its variable bindings, and the fork-join helper the bulk operators use.
pub mod core;

/// Binary operator evaluation.
///
/// Integer arithmetic with overflow checks, promotion to float for uneven
/// division and negative exponents, and float arithmetic.
pub mod binary;

/// Evaluation of `{lower, upper}`, `map` and `reduce`.
///
/// Each operator splits its work into disjoint slices, evaluates them on
/// forked activations in parallel and joins before returning.
pub mod bulk;

/// Splitting of index spans into worker slices.
pub mod partition;

pub use self::core::{Activation, Bindings, Interpreter, Options};
