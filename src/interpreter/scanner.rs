use std::{iter::Peekable, str::Chars};

use crate::diagnostics::SourceLoc;

/// Signals that the scanner has no more characters.
///
/// This is the only way reading from a [`Scanner`] can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("reached end of input")]
pub struct EndOfInput;

/// Character reader with one character of lookahead that tracks the source
/// location of the next character.
///
/// `\n`, `\r` and `\r\n` each count as a single line break.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars:       Peekable<Chars<'a>>,
    line:        u32,
    column:      u32,
    last_was_cr: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { chars:       source.chars().peekable(),
               line:        1,
               column:      1,
               last_was_cr: false, }
    }

    /// Returns the next character without consuming it.
    pub fn peek(&mut self) -> Result<char, EndOfInput> {
        self.chars.peek().copied().ok_or(EndOfInput)
    }

    /// Consumes and returns the next character.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{
    ///     diagnostics::SourceLoc,
    ///     interpreter::scanner::{EndOfInput, Scanner},
    /// };
    ///
    /// let mut scanner = Scanner::new("a\r\nb");
    /// assert_eq!(scanner.consume(), Ok('a'));
    /// assert_eq!(scanner.consume(), Ok('\r'));
    /// assert_eq!(scanner.consume(), Ok('\n'));
    /// assert_eq!(scanner.location(), SourceLoc::new(2, 1));
    /// assert_eq!(scanner.consume(), Ok('b'));
    /// assert_eq!(scanner.consume(), Err(EndOfInput));
    /// ```
    pub fn consume(&mut self) -> Result<char, EndOfInput> {
        let c = self.chars.next().ok_or(EndOfInput)?;
        match c {
            '\n' if self.last_was_cr => {},
            '\n' | '\r' => {
                self.line += 1;
                self.column = 1;
            },
            _ => self.column += 1,
        }
        self.last_was_cr = c == '\r';
        Ok(c)
    }

    /// Consumes the next character only if it satisfies `predicate`.
    pub fn consume_if(&mut self, predicate: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Ok(c) if predicate(c) => self.consume().ok(),
            _ => None,
        }
    }

    /// Consumes characters for as long as they satisfy `predicate`.
    pub fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.consume_if(&predicate).is_some() {}
    }

    /// The location of the next character.
    #[must_use]
    pub const fn location(&self) -> SourceLoc {
        SourceLoc::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_columns_and_lines() {
        let mut scanner = Scanner::new("ab\ncd");
        assert_eq!(scanner.location(), SourceLoc::new(1, 1));
        scanner.consume_while(|c| c != '\n');
        assert_eq!(scanner.location(), SourceLoc::new(1, 3));
        assert_eq!(scanner.consume(), Ok('\n'));
        assert_eq!(scanner.location(), SourceLoc::new(2, 1));
        assert_eq!(scanner.consume(), Ok('c'));
        assert_eq!(scanner.location(), SourceLoc::new(2, 2));
    }

    #[test]
    fn lone_carriage_return_breaks_line() {
        let mut scanner = Scanner::new("a\rb\r\rc");
        scanner.consume_while(|c| c != 'c');
        assert_eq!(scanner.location(), SourceLoc::new(4, 1));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut scanner = Scanner::new("x");
        assert_eq!(scanner.peek(), Ok('x'));
        assert_eq!(scanner.peek(), Ok('x'));
        assert_eq!(scanner.location(), SourceLoc::START);
        assert_eq!(scanner.consume_if(|c| c == 'y'), None);
        assert_eq!(scanner.consume_if(|c| c == 'x'), Some('x'));
        assert_eq!(scanner.peek(), Err(EndOfInput));
    }
}
