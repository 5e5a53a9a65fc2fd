use crate::{
    ast::Stmt,
    diagnostics::{Diagnostics, Span},
    error::ParseError,
    interpreter::{
        consumer::StmtConsumer,
        lexer::{Lexer, Token, TokenKind},
    },
};

/// Marks a rule that failed. Its diagnostic has already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abandoned;

pub type ParseResult<T> = Result<T, Abandoned>;

/// Identifiers that start a statement. Recovery resumes at these.
const STATEMENT_KEYWORDS: [&str; 3] = ["var", "out", "print"];

/// Recursive descent parser with one token of lookahead.
///
/// Comments are skipped. Every parsed statement is handed to a
/// [`StmtConsumer`] right away, so later stages run interleaved with parsing.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer:       Lexer<'a>,
    peeked:      Option<Token>,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { lexer:       Lexer::new(source),
               peeked:      None,
               diagnostics: Diagnostics::new(), }
    }

    /// Parses the whole input, passing each statement to `consumer`.
    ///
    /// Returns every diagnostic reported by the lexer, the parser and the
    /// consumer chain, in the order they were reported.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{ast::Stmt, interpreter::parser::Parser};
    ///
    /// let mut statements: Vec<Stmt> = Vec::new();
    /// let diagnostics = Parser::new("var x = 1\nout (x\nout 2").parse(&mut statements);
    ///
    /// assert_eq!(statements.len(), 2);
    /// assert_eq!(diagnostics.len(), 1);
    /// assert_eq!(diagnostics.errors()[0].message(), "Expected ')' but found 'out'");
    /// ```
    pub fn parse(mut self, consumer: &mut impl StmtConsumer) -> Diagnostics {
        while let Some(stmt) = self.parse_next_stmt() {
            tracing::trace!(start = %stmt.span.start, "parsed statement");
            consumer.consume_stmt(stmt, &mut self.diagnostics);
        }
        self.diagnostics
    }

    /// Parses statements until one succeeds or the input ends.
    ///
    /// After a failed statement, tokens are skipped until the next `var`,
    /// `out` or `print`.
    pub fn parse_next_stmt(&mut self) -> Option<Stmt> {
        loop {
            if self.peek().kind == TokenKind::Eof {
                return None;
            }
            match self.parse_statement() {
                Ok(stmt) => return Some(stmt),
                Err(Abandoned) => self.skip_to_next_statement(),
            }
        }
    }

    fn skip_to_next_statement(&mut self) {
        loop {
            let token = self.peek();
            if token.kind == TokenKind::Eof
               || STATEMENT_KEYWORDS.iter().any(|keyword| token.is_identifier(keyword))
            {
                return;
            }
            self.consume();
        }
    }

    pub(super) fn peek(&mut self) -> &Token {
        self.peeked
            .get_or_insert_with(|| Self::next_significant(&mut self.lexer, &mut self.diagnostics))
    }

    pub(super) fn consume(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => Self::next_significant(&mut self.lexer, &mut self.diagnostics),
        }
    }

    fn next_significant(lexer: &mut Lexer<'a>, diagnostics: &mut Diagnostics) -> Token {
        loop {
            let token = lexer.next_token(diagnostics);
            if token.kind != TokenKind::Comment {
                return token;
            }
        }
    }

    /// Consumes the next token if it is of `kind`.
    ///
    /// Otherwise reports `error` with the spelling of the token that was
    /// found, optionally suggesting to insert `fix_it` in front of it. The
    /// unexpected token is left in place.
    pub(super) fn expect(&mut self,
                         kind: TokenKind,
                         error: impl FnOnce(String) -> ParseError,
                         fix_it: Option<&str>)
                         -> ParseResult<Token> {
        if self.peek().kind == kind {
            return Ok(self.consume());
        }

        let token = self.peek();
        let span = token.span;
        let found = token.to_source_string();
        let diagnostic = self.diagnostics.error(span, error(found));
        if let Some(insertion) = fix_it {
            diagnostic.fix_it_insert(span.start, insertion);
        }
        Err(Abandoned)
    }

    /// Reports `error` at `at` and abandons the current rule.
    pub(super) fn fail<T>(&mut self, at: impl Into<Span>, error: ParseError) -> ParseResult<T> {
        self.diagnostics.error(at, error);
        Err(Abandoned)
    }
}
