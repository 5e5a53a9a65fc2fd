/// Represents all errors the parser can report.
///
/// Most variants carry `found`, the source spelling of the token that was seen
/// instead of the expected one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A statement starts with something other than `var`, `out` or `print`.
    #[error("Unexpected start of statements. Statements must start with 'var', 'out' or 'print' but found '{found}'")]
    UnexpectedStartOfStatement { found: String },
    /// `print` is not followed by a string literal.
    #[error("Expected a string literal after 'print' but got '{found}'")]
    ExpectedStringAfterPrint { found: String },
    /// `var` is not followed by the name of the variable.
    #[error("Expected an identifier after 'var' but found '{found}'")]
    ExpectedIdentifierAfterVar { found: String },
    /// The `=` of an assignment is missing.
    #[error("Expected a '=' in an assignment statement but found '{found}'")]
    ExpectedAssignSign { found: String },
    /// A token that cannot start an expression.
    #[error("Expected an expression but found '{found}'")]
    ExpectedExpression { found: String },
    #[error("Expected ',' to separate the lower and upper bound of a range but found '{found}'")]
    ExpectedCommaInRange { found: String },
    #[error("Expected ',' to separate argument and lambda in 'map' but found '{found}'")]
    ExpectedCommaInMap { found: String },
    #[error("Expected ',' to separate argument and base in 'reduce' but found '{found}'")]
    ExpectedCommaInReduce { found: String },
    #[error("Expected ',' to separate base and lambda in 'reduce' but found '{found}'")]
    ExpectedCommaBeforeReduceLambda { found: String },
    #[error("Expected '->' to separate parameter and body in lambda but found '{found}'")]
    ExpectedArrow { found: String },
    #[error("Expected lambda parameter but found '{found}'")]
    ExpectedLambdaParameter { found: String },
    #[error("Expected '(' but found '{found}'")]
    ExpectedLParen { found: String },
    #[error("Expected ')' but found '{found}'")]
    ExpectedRParen { found: String },
    #[error("Expected '}}' but found '{found}'")]
    ExpectedRBrace { found: String },
    /// An integer literal that does not fit into 64 bits.
    #[error("Integer literal '{literal}' is too large")]
    LiteralTooLarge { literal: String },
}
