/// Represents all errors the lexer can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A second `.` inside a number literal.
    #[error("A number literal can only contain one '.'")]
    TwoDotsInNumber,
    /// A `.` (or `-.`) that is not followed by any digit.
    #[error("A single dot is no number literal")]
    SingleDot,
    /// A backslash followed by a character that has no escape meaning.
    #[error("Unknown escape sequence '\\{escape}'")]
    UnknownEscape {
        /// The character after the backslash.
        escape: char,
    },
    /// A line break inside a string literal.
    #[error("Found end of line before string literal was terminated")]
    EolInString,
    /// End of input inside a string literal.
    #[error("Reached end of file before string literal was terminated")]
    EofInString,
    /// A character that cannot start any token.
    #[error("'{character}' is an invalid character at this position")]
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
}
