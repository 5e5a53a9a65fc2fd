use crate::ast::{BinaryOperator, Type};

/// Represents all errors the type checker can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// `var` declares a name that already exists in the same scope.
    #[error("Variable '{name}' has already been declared")]
    AlreadyDeclared { name: String },
    /// A reference to a name that no enclosing scope declares.
    #[error("Variable '{name}' referenced before declaration")]
    Undeclared { name: String },
    /// An arithmetic operator applied to something that is not a number.
    #[error("Arithmetic operator '{op}' can only be used on number types and not on '{lhs}' and '{rhs}'")]
    OperatorOnNonNumber {
        op:  BinaryOperator,
        lhs: Type,
        rhs: Type,
    },
    #[error("Argument for 'map' must be a sequence, '{found}' given")]
    MapArgumentNotSequence { found: Type },
    #[error("First argument for 'reduce' must be a sequence, '{found}' given")]
    ReduceArgumentNotSequence { found: Type },
    /// The reduce lambda's body type differs from the type of the base.
    #[error("The lambda of 'reduce' must return the same type as the base element ('{base}'). Got '{found}'")]
    ReduceLambdaType { base: Type, found: Type },
    #[error("Lower bound of a range must be an integer and not '{found}'")]
    LowerBoundNotNumber { found: Type },
    #[error("Upper bound of a range must be an integer and not '{found}'")]
    UpperBoundNotNumber { found: Type },
}
