use std::fmt;

use crate::error::Error;

/// A position in the source text.
///
/// Lines and columns both start at 1. Locations are ordered first by line and
/// then by column, which is also the order in which statement output is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLoc {
    /// 1-based line number.
    pub line:   u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl SourceLoc {
    /// The location of the first character of any source text.
    pub const START: Self = Self { line:   1,
                                   column: 1, };

    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open region `[start, end)` of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: SourceLoc,
    pub end:   SourceLoc,
}

impl Span {
    #[must_use]
    pub const fn new(start: SourceLoc, end: SourceLoc) -> Self {
        Self { start, end }
    }

    /// An empty span located at `loc`.
    #[must_use]
    pub const fn point(loc: SourceLoc) -> Self {
        Self { start: loc,
               end:   loc, }
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self { start: self.start.min(other.start),
               end:   self.end.max(other.end), }
    }
}

impl From<SourceLoc> for Span {
    fn from(loc: SourceLoc) -> Self {
        Self::point(loc)
    }
}

impl From<(SourceLoc, SourceLoc)> for Span {
    fn from((start, end): (SourceLoc, SourceLoc)) -> Self {
        Self::new(start, end)
    }
}

/// The pipeline stage that reported a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lex,
    Parse,
    Type,
    Runtime,
}

/// A suggested edit: insert `insertion` right before `location`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixIt {
    pub location:  SourceLoc,
    pub insertion: String,
}

/// A single reported error.
///
/// Every diagnostic is fatal to the statement or expression that produced it
/// but never stops the pipeline; there are no warnings and no severities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Region of the source the error refers to.
    pub span:   Span,
    /// What went wrong.
    pub error:  Error,
    /// Optional suggestion that fixes the error.
    pub fix_it: Option<FixIt>,
}

impl Diagnostic {
    /// Renders the user-facing error message.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.error.stage()
    }

    /// Attaches a suggestion to insert `insertion` at `location`.
    ///
    /// A diagnostic carries at most one fix-it; a second call replaces the
    /// first.
    pub fn fix_it_insert(&mut self,
                         location: SourceLoc,
                         insertion: impl Into<String>)
                         -> &mut Self {
        self.fix_it = Some(FixIt { location,
                                   insertion: insertion.into() });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.span.start, self.span.end, self.error)
    }
}

/// Append-only log of everything that went wrong during a pipeline run.
///
/// Every stage writes to the same log. Entries are kept in the order in which
/// they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error and returns it so a fix-it can be attached.
    ///
    /// `at` may be anything that converts into a [`Span`]: a single location,
    /// a `(start, end)` pair, a token or an AST node.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{
    ///     diagnostics::{Diagnostics, SourceLoc},
    ///     error::ParseError,
    /// };
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// let at = SourceLoc::new(1, 5);
    /// diagnostics.error(at, ParseError::ExpectedRParen { found: "EOF".into() })
    ///            .fix_it_insert(at, ")");
    ///
    /// assert_eq!(diagnostics.len(), 1);
    /// assert_eq!(diagnostics.errors()[0].message(), "Expected ')' but found 'EOF'");
    /// ```
    pub fn error(&mut self, at: impl Into<Span>, error: impl Into<Error>) -> &mut Diagnostic {
        let diagnostic = Diagnostic { span:   at.into(),
                                      error:  error.into(),
                                      fix_it: None, };
        tracing::debug!(location = %diagnostic.span.start,
                        message = %diagnostic.error,
                        "diagnostic");

        let index = self.errors.len();
        self.errors.push(diagnostic);
        &mut self.errors[index]
    }

    /// Moves all entries of `other` to the end of this log, leaving `other`
    /// empty.
    pub fn append(&mut self, other: &mut Self) {
        self.errors.append(&mut other.errors);
    }

    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.errors.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type IntoIter = std::slice::Iter<'a, Diagnostic>;
    type Item = &'a Diagnostic;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
