use std::collections::{BTreeMap, VecDeque};

use crate::{
    diagnostics::{Diagnostic, SourceLoc},
    interpreter::lexer::{Token, TokenKind},
    lex,
};

/// An error a program announces it will produce.
///
/// Written as a comment of the form
/// `#expectedError@` (line offset `:`)? column `:` message, where the line
/// offset is `+N` or `-N` relative to the comment's own line:
///
/// ```text
/// var x = x #expectedError@9: Variable 'x' referenced before declaration
/// ```
///
/// Only the start of the diagnostic is compared, not its end.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpectedError {
    pub location: SourceLoc,
    pub message:  String,
}

impl ExpectedError {
    /// Reads a directive out of the text of a comment starting on `line`.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{diagnostics::SourceLoc, verifier::ExpectedError};
    ///
    /// let expected = ExpectedError::from_comment("# expectedError@+1:5: Division by 0", 3).unwrap();
    /// assert_eq!(expected.location, SourceLoc::new(4, 5));
    /// assert_eq!(expected.message, "Division by 0");
    ///
    /// assert_eq!(ExpectedError::from_comment("# just a comment", 3), None);
    /// ```
    #[must_use]
    pub fn from_comment(comment: &str, line: u32) -> Option<Self> {
        comment.match_indices('#')
               .find_map(|(at, _)| parse_directive(&comment[at + 1..], line))
    }

    fn matches(&self, diagnostic: &Diagnostic) -> bool {
        self.location == diagnostic.span.start && self.message == diagnostic.message()
    }
}

fn parse_directive(text: &str, line: u32) -> Option<ExpectedError> {
    let rest = text.trim_start().strip_prefix("expectedError@")?;

    let (offset, rest) = match rest.strip_prefix(['+', '-']) {
        Some(unsigned) => {
            let digits = leading_digits(unsigned);
            if digits == 0 {
                return None;
            }
            let end = digits + 1;
            (rest[..end].parse::<i64>().ok()?, &rest[end..])
        },
        None => (0, rest),
    };
    let rest = rest.strip_prefix(':').unwrap_or(rest);

    let digits = leading_digits(rest);
    if digits == 0 {
        return None;
    }
    let column = rest[..digits].parse().ok()?;
    let message = rest[digits..].strip_prefix(':')?.trim();
    if message.is_empty() {
        return None;
    }

    let line = u32::try_from(i64::from(line).checked_add(offset)?).ok()?;
    Some(ExpectedError { location: SourceLoc::new(line, column),
                         message:  message.to_string(), })
}

fn leading_digits(text: &str) -> usize {
    text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len())
}

/// A difference between what a program announced and what a run produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    /// A `CHECK:` pattern that no output line after the previous pattern
    /// contains.
    #[error("Pattern not found: {pattern}")]
    PatternNotFound { pattern: String },
    #[error("Unexpected error seen: {location}: {message}")]
    UnexpectedError {
        location: SourceLoc,
        message:  String,
    },
    #[error("Expected error not seen: {location}: {message}")]
    MissingError {
        location: SourceLoc,
        message:  String,
    },
}

/// Compares a run against the expectations written into its source.
///
/// Besides expected-error directives, every line containing `CHECK:` adds
/// the trimmed rest of that line as a pattern. Patterns have to show up in the
/// output in the order they were written, each in some line after the line
/// that matched the previous one.
///
/// # Example
/// ```
/// use seqcalc::{evaluate, verifier::Verifier};
///
/// let source = "out 1/0 #expectedError@5: Division by 0\n\
///               out 2 # CHECK: <error>\n\
///               ## CHECK: 2\n";
/// let evaluation = evaluate(source);
/// let output = evaluation.rendered_output().join("\n");
///
/// assert_eq!(Verifier::from_source(source).verify(&output, &evaluation.diagnostics), Ok(()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    expected: BTreeMap<ExpectedError, bool>,
    patterns: VecDeque<String>,
}

impl Verifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the directives of all comments and all `CHECK:` patterns of
    /// `source`.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        let mut verifier = Self::new();
        for token in &lex(source) {
            verifier.add_potential_expected_error(token);
        }
        for line in source.lines() {
            if let Some((_, pattern)) = line.split_once("CHECK:") {
                verifier.patterns.push_back(pattern.trim().to_string());
            }
        }
        verifier
    }

    /// Records the directive in `token`, if it is a comment holding one.
    pub fn add_potential_expected_error(&mut self, token: &Token) {
        if token.kind != TokenKind::Comment {
            return;
        }
        if let Some(expected) = ExpectedError::from_comment(token.payload(), token.span.start.line)
        {
            self.expected.insert(expected, false);
        }
    }

    pub fn expected_errors(&self) -> impl Iterator<Item = &ExpectedError> {
        self.expected.keys()
    }

    #[must_use]
    pub fn patterns(&self) -> &VecDeque<String> {
        &self.patterns
    }

    /// Checks `output` against the patterns and `diagnostics` against the
    /// expected errors.
    ///
    /// Reports the first pattern that was not found, then every diagnostic no
    /// directive announced, then every directive no diagnostic matched.
    pub fn verify(mut self, output: &str, diagnostics: &[Diagnostic]) -> Result<(), Vec<Mismatch>> {
        let mut mismatches = Vec::new();

        for line in output.lines() {
            if self.patterns.front().is_some_and(|pattern| line.contains(pattern.as_str())) {
                self.patterns.pop_front();
            }
        }
        if let Some(pattern) = self.patterns.pop_front() {
            mismatches.push(Mismatch::PatternNotFound { pattern });
        }

        for diagnostic in diagnostics {
            let mut matched = false;
            for (expected, seen) in &mut self.expected {
                if expected.matches(diagnostic) {
                    *seen = true;
                    matched = true;
                }
            }
            if !matched {
                mismatches.push(Mismatch::UnexpectedError { location: diagnostic.span.start,
                                                            message:  diagnostic.message(), });
            }
        }

        mismatches.extend(self.expected
                              .into_iter()
                              .filter(|(_, seen)| !seen)
                              .map(|(expected, _)| {
                                  Mismatch::MissingError { location: expected.location,
                                                           message:  expected.message, }
                              }));

        if mismatches.is_empty() { Ok(()) } else { Err(mismatches) }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::evaluate;

    fn run(source: &str) -> Result<(), Vec<Mismatch>> {
        let evaluation = evaluate(source);
        let output = evaluation.rendered_output().join("\n");
        Verifier::from_source(source).verify(&output, &evaluation.diagnostics)
    }

    #[test]
    fn directive_forms() {
        let at = |text| ExpectedError::from_comment(text, 10).map(|e| (e.location, e.message));

        assert_eq!(at("#expectedError@7: m"), Some((SourceLoc::new(10, 7), "m".into())));
        assert_eq!(at("#expectedError@-2:7:m"), Some((SourceLoc::new(8, 7), "m".into())));
        assert_eq!(at("#  expectedError@+1 3: m"), None);
        assert_eq!(at("#expectedError@+1:3:   spaced out  "),
                   Some((SourceLoc::new(11, 3), "spaced out".into())));
        assert_eq!(at("# note #expectedError@4: later"),
                   Some((SourceLoc::new(10, 4), "later".into())));
    }

    #[test]
    fn malformed_directives_are_ignored() {
        for text in ["#expectedError@",
                     "#expectedError@x: m",
                     "#expectedError@5:",
                     "#expectedError@+:5: m",
                     "#expectedError@-20:1: m"]
        {
            assert_eq!(ExpectedError::from_comment(text, 10), None, "{text}");
        }
    }

    #[test]
    fn patterns_in_order() {
        assert_eq!(run("out 1\nout 2\n# CHECK: 1\n# CHECK: 2"), Ok(()));
        assert_eq!(run("out 1\nout 2\n# CHECK: 2\n# CHECK: 1"),
                   Err(vec![Mismatch::PatternNotFound { pattern: "1".into() }]));
    }

    #[test]
    fn check_line_on_its_own_comment() {
        let source = "out 1/0 #expectedError@5: Division by 0\n\
                      out 2 # CHECK: <error>\n\
                      # CHECK: 2\n";
        let verifier = Verifier::from_source(source);
        assert_eq!(*verifier.patterns(), ["<error>", "2"]);
        assert_eq!(run(source), Ok(()));
    }

    #[test]
    fn unexpected_and_missing_errors() {
        let mismatches = run("out 1/0\nout 1 #expectedError@5: Division by 0").unwrap_err();
        assert_eq!(mismatches,
                   vec![Mismatch::UnexpectedError { location: SourceLoc::new(1, 5),
                                                    message:  "Division by 0".into(), },
                        Mismatch::MissingError { location: SourceLoc::new(2, 5),
                                                 message:  "Division by 0".into(), },]);
    }

    #[test]
    fn expected_error_on_following_line() {
        assert_eq!(run("#expectedError@+1:9: Variable 'x' referenced before declaration\nvar x = \
                        x"),
                   Ok(()));
    }

    #[test]
    fn mismatch_messages() {
        let mismatch = Mismatch::MissingError { location: SourceLoc::new(2, 5),
                                                message:  "Division by 0".into(), };
        assert_eq!(mismatch.to_string(), "Expected error not seen: 2:5: Division by 0");
    }
}
