use crate::{
    ast::{Binding, Stmt, StmtKind},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a single statement.
    ///
    /// Grammar:
    /// ```text
    /// stmt := 'var' IDENT '=' expr
    ///       | 'out' expr
    ///       | 'print' STRING
    /// ```
    ///
    /// The first token is always consumed, so the statement loop makes
    /// progress even if the statement fails.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.consume();
        if keyword.kind == TokenKind::Identifier {
            match keyword.payload() {
                "var" => return self.parse_assignment(&keyword),
                "out" => {
                    let expr = self.parse_expression()?;
                    return Ok(Stmt { span: keyword.span.to(expr.span),
                                     kind: StmtKind::Out(expr), });
                },
                "print" => return self.parse_print(&keyword),
                _ => {},
            }
        }

        let found = keyword.to_source_string();
        self.fail(&keyword, ParseError::UnexpectedStartOfStatement { found })
    }

    /// `'var' IDENT '=' expr`, positioned after `var`.
    fn parse_assignment(&mut self, keyword: &Token) -> ParseResult<Stmt> {
        let target = self.parse_binding(|found| ParseError::ExpectedIdentifierAfterVar { found })?;
        self.expect(TokenKind::Assign,
                    |found| ParseError::ExpectedAssignSign { found },
                    None)?;
        let value = self.parse_expression()?;

        Ok(Stmt { span: keyword.span.to(value.span),
                  kind: StmtKind::Assign { target, value }, })
    }

    /// `'print' STRING`, positioned after `print`.
    fn parse_print(&mut self, keyword: &Token) -> ParseResult<Stmt> {
        let string = self.expect(TokenKind::StringLiteral,
                                 |found| ParseError::ExpectedStringAfterPrint { found },
                                 None)?;

        Ok(Stmt { span: keyword.span.to(string.span),
                  kind: StmtKind::Print(string.payload.unwrap_or_default()), })
    }

    /// Parses an identifier that declares a new variable.
    pub(super) fn parse_binding(&mut self, error: impl FnOnce(String) -> ParseError)
                                -> ParseResult<Binding> {
        let name = self.expect(TokenKind::Identifier, error, None)?;
        Ok(Binding::new(name.payload.unwrap_or_default(), name.span))
    }
}
