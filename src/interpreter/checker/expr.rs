use crate::{
    ast::{Expr, ExprKind, Type},
    diagnostics::Diagnostics,
    error::TypeError,
    interpreter::checker::{
        core::{CheckResult, Rejected, Variables},
        scope::Scope,
    },
};

impl Variables {
    /// Computes the type of `expr` and records it on every checked node.
    ///
    /// Rules:
    /// - literals are `Number`;
    /// - a reference takes the type of the variable it resolves to;
    /// - both operands of an arithmetic operator must be `Number`;
    /// - both bounds of a range must be `Number`, the range is
    ///   `Sequence<Number>`;
    /// - `map` over `Sequence<T>` checks its body with the parameter typed `T`
    ///   and yields `Sequence<body>`;
    /// - `reduce` over `Sequence<T>` types its parameters as (base, `T`), its
    ///   body must have the base's type, which is also its result.
    ///
    /// # Parameters
    /// - `expr`: The expression to check.
    /// - `scope`: Innermost frame of the scope chain to resolve names in.
    /// - `diagnostics`: Receives the first error found.
    ///
    /// # Returns
    /// The type of `expr`, or [`Rejected`] once an error has been reported.
    pub fn check_expr(&mut self,
                      expr: &Expr,
                      scope: &Scope<'_>,
                      diagnostics: &mut Diagnostics)
                      -> CheckResult<Type> {
        let ty = match &expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::FloatLiteral(_) => Type::Number,
            ExprKind::VariableRef { name, target } => {
                let Some(variable) = scope.lookup(name).and_then(|id| self.get(id)) else {
                    diagnostics.error(expr, TypeError::Undeclared { name: name.clone() });
                    return Err(Rejected);
                };
                let already = target.set(variable.id).is_err();
                debug_assert!(!already, "reference to '{name}' resolved twice");
                variable.ty.clone()
            },
            ExprKind::Binary { lhs, op, rhs } => {
                let lhs = self.check_expr(lhs, scope, diagnostics)?;
                let rhs = self.check_expr(rhs, scope, diagnostics)?;
                if lhs != Type::Number || rhs != Type::Number {
                    diagnostics.error(expr, TypeError::OperatorOnNonNumber { op: *op, lhs, rhs });
                    return Err(Rejected);
                }
                Type::Number
            },
            ExprKind::Paren(inner) => self.check_expr(inner, scope, diagnostics)?,
            ExprKind::Range { lower, upper } => {
                let lower_ty = self.check_expr(lower, scope, diagnostics)?;
                let upper_ty = self.check_expr(upper, scope, diagnostics)?;
                if lower_ty != Type::Number {
                    diagnostics.error(lower.as_ref(),
                                      TypeError::LowerBoundNotNumber { found: lower_ty });
                    return Err(Rejected);
                }
                if upper_ty != Type::Number {
                    diagnostics.error(upper.as_ref(),
                                      TypeError::UpperBoundNotNumber { found: upper_ty });
                    return Err(Rejected);
                }
                Type::sequence(Type::Number)
            },
            ExprKind::Map { argument,
                            param,
                            body, } => {
                let argument_ty = self.check_expr(argument, scope, diagnostics)?;
                let Some(element) = argument_ty.element() else {
                    diagnostics.error(argument.as_ref(),
                                      TypeError::MapArgumentNotSequence { found: argument_ty });
                    return Err(Rejected);
                };

                let mut lambda = Scope::child(scope);
                let id = self.declare(param, element.clone());
                lambda.declare(param.name.as_str(), id);

                Type::sequence(self.check_expr(body, &lambda, diagnostics)?)
            },
            ExprKind::Reduce { sequence,
                               base,
                               accumulator,
                               element,
                               body, } => {
                // Both operands are checked even if the first fails.
                let base_ty = self.check_expr(base, scope, diagnostics);
                let sequence_ty = self.check_expr(sequence, scope, diagnostics);
                let (base_ty, sequence_ty) = (base_ty?, sequence_ty?);
                let Some(element_ty) = sequence_ty.element() else {
                    diagnostics.error(sequence.as_ref(),
                                      TypeError::ReduceArgumentNotSequence { found: sequence_ty });
                    return Err(Rejected);
                };

                let mut lambda = Scope::child(scope);
                let accumulator_id = self.declare(accumulator, base_ty.clone());
                lambda.declare(accumulator.name.as_str(), accumulator_id);
                if lambda.declares(&element.name) {
                    diagnostics.error(element,
                                      TypeError::AlreadyDeclared { name: element.name.clone() });
                    return Err(Rejected);
                }
                let element_id = self.declare(element, element_ty.clone());
                lambda.declare(element.name.as_str(), element_id);

                let body_ty = self.check_expr(body, &lambda, diagnostics)?;
                if body_ty != base_ty {
                    diagnostics.error(body.as_ref(),
                                      TypeError::ReduceLambdaType { base:  base_ty,
                                                                    found: body_ty, });
                    return Err(Rejected);
                }
                base_ty
            },
        };

        expr.assign_type(ty.clone());
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::{ExprKind, Stmt, StmtKind, Type},
        error::{Error, TypeError},
        interpreter::{checker::TypeChecker, parser::Parser},
    };

    fn check(source: &str) -> (Vec<Stmt>, Vec<Error>) {
        let mut checker = TypeChecker::new(Vec::new());
        let diagnostics = Parser::new(source).parse(&mut checker);
        (checker.into_next(), diagnostics.into_vec().into_iter().map(|d| d.error).collect())
    }

    fn out_type(stmt: &Stmt) -> Option<&Type> {
        match &stmt.kind {
            StmtKind::Out(expr) => expr.ty(),
            _ => None,
        }
    }

    #[test]
    fn infers_bulk_types() {
        let (stmts, errors) =
            check("out map({1, 3}, x -> {x, 5})\nout reduce({1, 4}, 0, a b -> a + b)");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(out_type(&stmts[0]), Some(&Type::sequence(Type::sequence(Type::Number))));
        assert_eq!(out_type(&stmts[1]), Some(&Type::Number));
    }

    #[test]
    fn self_reference_is_undeclared() {
        let (stmts, errors) = check("var x = x");
        assert!(stmts.is_empty());
        assert_eq!(errors,
                   [Error::Type(TypeError::Undeclared { name: "x".to_string() })]);
    }

    #[test]
    fn redeclaration_is_rejected_but_shadowing_is_not() {
        let (stmts, errors) = check("var x = 1\nvar x = 2\nout map({1, 2}, x -> x)");
        assert_eq!(stmts.len(), 2);
        assert_eq!(errors,
                   [Error::Type(TypeError::AlreadyDeclared { name: "x".to_string() })]);
    }

    #[test]
    fn lambda_parameter_resolves_to_innermost_variable() {
        let (stmts, errors) = check("var x = {1, 2}\nout map(x, x -> x * 2)");
        assert!(errors.is_empty());
        let StmtKind::Out(expr) = &stmts[1].kind else { panic!("expected out") };
        let ExprKind::Map { argument, param, body } = &expr.kind else { panic!("expected map") };
        let ExprKind::VariableRef { target: outer, .. } = &argument.kind else { panic!() };
        let ExprKind::Binary { lhs, .. } = &body.kind else { panic!() };
        let ExprKind::VariableRef { target: inner, .. } = &lhs.kind else { panic!() };

        assert_eq!(inner.get().copied(), param.id());
        assert_ne!(outer.get(), inner.get());
    }

    #[test]
    fn reduce_parameters_must_differ() {
        let mut checker = TypeChecker::new(Vec::new());
        let diagnostics = Parser::new("out reduce({1, 4}, 0, a a -> a)\nout 1").parse(&mut checker);
        let diagnostics = diagnostics.into_vec();

        assert_eq!(checker.into_next().len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].error,
                   Error::Type(TypeError::AlreadyDeclared { name: "a".to_string() }));
        assert_eq!((diagnostics[0].span.start.line, diagnostics[0].span.start.column), (1, 25));
    }

    #[test]
    fn reduce_parameters_may_shadow_outer_variables() {
        let (stmts, errors) = check("var a = 1\nout reduce({1, 4}, 0, a b -> a + b)");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn lambda_parameters_do_not_leak() {
        let (_, errors) = check("out map({1, 2}, y -> y)\nout y");
        assert_eq!(errors,
                   [Error::Type(TypeError::Undeclared { name: "y".to_string() })]);
    }

    #[test]
    fn operator_on_sequence() {
        let (_, errors) = check("out {1, 2} + 1");
        assert_eq!(errors[0].to_string(),
                   "Arithmetic operator '+' can only be used on number types and not on \
                    'Sequence<Number>' and 'Number'");
    }

    #[test]
    fn bulk_argument_must_be_sequence() {
        let (_, errors) = check("out map(1, x -> x)\nout reduce(2, 0, a b -> a)");
        assert_eq!(errors[0].to_string(), "Argument for 'map' must be a sequence, 'Number' given");
        assert_eq!(errors[1].to_string(),
                   "First argument for 'reduce' must be a sequence, 'Number' given");
    }

    #[test]
    fn reduce_body_must_return_base_type() {
        let (_, errors) = check("out reduce({1, 2}, 0, a b -> {a, b})");
        assert_eq!(errors[0].to_string(),
                   "The lambda of 'reduce' must return the same type as the base element \
                    ('Number'). Got 'Sequence<Number>'");
    }

    #[test]
    fn range_bounds_must_be_numbers() {
        let (_, errors) = check("out {{1, 2}, 3}");
        assert_eq!(errors[0].to_string(),
                   "Lower bound of a range must be an integer and not 'Sequence<Number>'");
    }
}
