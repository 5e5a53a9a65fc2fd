use crate::ast::BinaryOperator;

/// Represents all errors that can occur during evaluation.
///
/// Reporting one of these never aborts the program: the expression that
/// failed evaluates to the error value instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Attempted division by zero, for integers and floats alike.
    #[error("Division by 0")]
    DivisionByZero,
    /// Integer arithmetic left the 64 bit range.
    #[error("Integer overflow while evaluating '{op}'")]
    Overflow {
        /// The operator whose result overflowed.
        op: BinaryOperator,
    },
    /// A range whose upper bound is smaller than its lower bound.
    #[error("Upper bound of range cannot be smaller than the lower bound")]
    InvertedRange,
    /// The lower bound of a range evaluated to something other than an int.
    #[error("Lower bound of a range must be an integer and not '{found}'")]
    LowerBoundNotInt {
        /// Runtime kind of the bound, e.g. `Float`.
        found: &'static str,
    },
    /// The upper bound of a range evaluated to something other than an int.
    #[error("Upper bound of a range must be an integer and not '{found}'")]
    UpperBoundNotInt {
        /// Runtime kind of the bound, e.g. `Float`.
        found: &'static str,
    },
    /// A range with more elements than can be allocated.
    #[error("Range of {elements} elements is too large")]
    RangeTooLarge {
        /// Number of elements the range would have had.
        elements: u128,
    },
}
