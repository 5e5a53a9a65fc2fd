use crate::{
    ast::{Expr, ExprKind},
    interpreter::parser::core::{ParseResult, Parser},
};

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing; it starts at the
    /// lowest precedence level.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_binary(0)
    }

    /// Precedence climbing.
    ///
    /// Parses a primary expression and then folds in every following operator
    /// that binds tighter than `precedence`. The right-hand side of an
    /// operator is parsed at the operator's own precedence, which makes
    /// operators of equal precedence associate to the left:
    ///
    /// ```text
    /// 1 - 2 - 3 ^ 2 * 4   =>   (1 - 2) - ((3 ^ 2) * 4)
    /// ```
    ///
    /// # Parameters
    /// - `precedence`: Operators must bind strictly tighter than this to be
    ///   consumed.
    ///
    /// # Returns
    /// The expression tree; its span covers all consumed tokens.
    fn parse_binary(&mut self, precedence: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_primary()?;

        while let Some(op) = self.peek().binary_operator()
              && op.precedence() > precedence
        {
            self.consume();
            let rhs = self.parse_binary(op.precedence())?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr::new(ExprKind::Binary { lhs: Box::new(lhs),
                                               op,
                                               rhs: Box::new(rhs) },
                            span);
        }

        Ok(lhs)
    }
}
