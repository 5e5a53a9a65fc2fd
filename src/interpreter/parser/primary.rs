use crate::{
    ast::{Expr, ExprKind},
    diagnostics::Span,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses an expression that contains no binary operator at its top level.
    ///
    /// Grammar:
    /// ```text
    /// primary := INT | FLOAT | '-' INT | '-' FLOAT
    ///          | IDENT
    ///          | '(' expr ')'
    ///          | '{' expr ',' expr '}'
    ///          | 'map' '(' expr ',' IDENT '->' expr ')'
    ///          | 'reduce' '(' expr ',' expr ',' IDENT IDENT '->' expr ')'
    /// ```
    ///
    /// A token that cannot start an expression is reported but not consumed.
    pub(super) fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        match token.kind {
            TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                let literal = self.consume();
                self.number_literal(literal.payload(), literal.kind, literal.span)
            },
            TokenKind::Sub => self.parse_negative_literal(),
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBrace => self.parse_range(),
            TokenKind::Identifier => {
                let name = self.consume();
                match name.payload() {
                    "map" => self.parse_map(&name),
                    "reduce" => self.parse_reduce(&name),
                    _ => Ok(Expr::variable_ref(name.payload.unwrap_or_default(), name.span)),
                }
            },
            _ => {
                let span = token.span;
                let found = token.to_source_string();
                self.fail(span, ParseError::ExpectedExpression { found })
            },
        }
    }

    fn number_literal(&mut self, text: &str, kind: TokenKind, span: Span) -> ParseResult<Expr> {
        if kind == TokenKind::IntLiteral {
            return match text.parse::<i64>() {
                Ok(value) => Ok(Expr::new(ExprKind::IntLiteral(value), span)),
                Err(_) => {
                    self.fail(span, ParseError::LiteralTooLarge { literal: text.to_string() })
                },
            };
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(Expr::new(ExprKind::FloatLiteral(value), span)),
            Err(_) => self.fail(span, ParseError::ExpectedExpression { found: text.to_string() }),
        }
    }

    /// A `-` directly followed by a number literal.
    ///
    /// The lexer only folds the sign into the literal where it cannot be a
    /// subtraction; this covers the remaining operand positions such as
    /// `out -1`.
    fn parse_negative_literal(&mut self) -> ParseResult<Expr> {
        let minus = self.consume();
        let next = self.peek();
        let adjacent = next.span.start == minus.span.end;
        if adjacent && matches!(next.kind, TokenKind::IntLiteral | TokenKind::FloatLiteral) {
            let literal = self.consume();
            let text = format!("-{}", literal.payload());
            return self.number_literal(&text, literal.kind, minus.span.to(literal.span));
        }
        self.fail(&minus,
                  ParseError::ExpectedExpression { found: minus.to_source_string() })
    }

    /// `'(' expr ')'`
    fn parse_paren(&mut self) -> ParseResult<Expr> {
        let open = self.consume();
        let inner = self.parse_expression()?;
        let close = self.expect_r_paren()?;
        Ok(Expr::new(ExprKind::Paren(Box::new(inner)), open.span.to(close.span)))
    }

    /// `'{' lower ',' upper '}'`
    fn parse_range(&mut self) -> ParseResult<Expr> {
        let open = self.consume();
        let lower = self.parse_expression()?;
        self.expect(TokenKind::Comma,
                    |found| ParseError::ExpectedCommaInRange { found },
                    Some(", "))?;
        let upper = self.parse_expression()?;
        let close = self.expect(TokenKind::RBrace,
                                |found| ParseError::ExpectedRBrace { found },
                                Some("}"))?;

        Ok(Expr::new(ExprKind::Range { lower: Box::new(lower),
                                       upper: Box::new(upper), },
                     open.span.to(close.span)))
    }

    /// `'(' argument ',' param '->' body ')'`, positioned after `map`.
    fn parse_map(&mut self, keyword: &Token) -> ParseResult<Expr> {
        self.expect_l_paren()?;
        let argument = self.parse_expression()?;
        self.expect(TokenKind::Comma,
                    |found| ParseError::ExpectedCommaInMap { found },
                    Some(", "))?;
        let param = self.parse_binding(|found| ParseError::ExpectedLambdaParameter { found })?;
        self.expect_arrow()?;
        let body = self.parse_expression()?;
        let close = self.expect_r_paren()?;

        Ok(Expr::new(ExprKind::Map { argument: Box::new(argument),
                                     param,
                                     body: Box::new(body) },
                     keyword.span.to(close.span)))
    }

    /// `'(' sequence ',' base ',' accumulator element '->' body ')'`,
    /// positioned after `reduce`.
    fn parse_reduce(&mut self, keyword: &Token) -> ParseResult<Expr> {
        self.expect_l_paren()?;
        let sequence = self.parse_expression()?;
        self.expect(TokenKind::Comma,
                    |found| ParseError::ExpectedCommaInReduce { found },
                    Some(", "))?;
        let base = self.parse_expression()?;
        self.expect(TokenKind::Comma,
                    |found| ParseError::ExpectedCommaBeforeReduceLambda { found },
                    Some(", "))?;
        let accumulator =
            self.parse_binding(|found| ParseError::ExpectedLambdaParameter { found })?;
        let element = self.parse_binding(|found| ParseError::ExpectedLambdaParameter { found })?;
        self.expect_arrow()?;
        let body = self.parse_expression()?;
        let close = self.expect_r_paren()?;

        Ok(Expr::new(ExprKind::Reduce { sequence: Box::new(sequence),
                                        base: Box::new(base),
                                        accumulator,
                                        element,
                                        body: Box::new(body) },
                     keyword.span.to(close.span)))
    }

    fn expect_l_paren(&mut self) -> ParseResult<Token> {
        self.expect(TokenKind::LParen,
                    |found| ParseError::ExpectedLParen { found },
                    Some("("))
    }

    fn expect_r_paren(&mut self) -> ParseResult<Token> {
        self.expect(TokenKind::RParen,
                    |found| ParseError::ExpectedRParen { found },
                    Some(")"))
    }

    fn expect_arrow(&mut self) -> ParseResult<Token> {
        self.expect(TokenKind::Arrow,
                    |found| ParseError::ExpectedArrow { found },
                    Some("->"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::Stmt,
        diagnostics::{FixIt, SourceLoc},
        interpreter::parser::Parser,
    };

    /// The fix-it of the first diagnostic reported for `source`.
    fn first_fix_it(source: &str) -> Option<FixIt> {
        let mut statements: Vec<Stmt> = Vec::new();
        let diagnostics = Parser::new(source).parse(&mut statements);
        diagnostics.into_vec().into_iter().next().and_then(|diagnostic| diagnostic.fix_it)
    }

    fn insert(line: u32, column: u32, insertion: &str) -> Option<FixIt> {
        Some(FixIt { location:  SourceLoc::new(line, column),
                     insertion: insertion.to_string(), })
    }

    #[test]
    fn missing_paren_suggests_closing_it() {
        assert_eq!(first_fix_it("out (1 + 2\nout 3"), insert(2, 1, ")"));
    }

    #[test]
    fn missing_commas_are_suggested_before_the_next_token() {
        assert_eq!(first_fix_it("out {1 3}"), insert(1, 8, ", "));
        assert_eq!(first_fix_it("out map({1, 3} x -> x)"), insert(1, 16, ", "));
        assert_eq!(first_fix_it("out reduce({1, 3} 0, a b -> a)"), insert(1, 19, ", "));
    }

    #[test]
    fn missing_arrow_is_suggested() {
        assert_eq!(first_fix_it("out map({1, 3}, x x)"), insert(1, 19, "->"));
        assert_eq!(first_fix_it("out reduce({1, 4}, 0, a b a + b)"), insert(1, 27, "->"));
    }

    #[test]
    fn missing_brace_is_suggested() {
        assert_eq!(first_fix_it("out {1, 3\nout 2"), insert(2, 1, "}"));
    }

    #[test]
    fn unexpected_expression_start_has_no_fix_it() {
        let mut statements: Vec<Stmt> = Vec::new();
        let diagnostics = Parser::new("out )").parse(&mut statements).into_vec();
        assert_eq!(diagnostics[0].message(), "Expected an expression but found ')'");
        assert_eq!(diagnostics[0].fix_it, None);
    }
}
