use crate::{
    ast::{Binding, Stmt, StmtKind, Type, Variable, VariableId},
    diagnostics::Diagnostics,
    error::TypeError,
    interpreter::{checker::scope::Scope, consumer::StmtConsumer},
};

/// Marks a statement or expression that failed to check. The diagnostic has
/// already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

pub type CheckResult<T> = Result<T, Rejected>;

/// Every variable declared so far, indexed by [`VariableId`].
#[derive(Debug, Default)]
pub struct Variables {
    variables: Vec<Variable>,
}

impl Variables {
    /// Allocates a fresh variable for `binding` and records its id there.
    pub fn declare(&mut self, binding: &Binding, ty: Type) -> VariableId {
        let id = VariableId::new(self.variables.len());
        self.variables.push(Variable { id,
                                       name: binding.name.clone(),
                                       ty });
        binding.declare(id);
        id
    }

    #[must_use]
    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Resolves variables, infers types and forwards well-typed statements.
///
/// A statement that fails any check is dropped; checking continues with the
/// next one.
///
/// # Example
/// ```
/// use seqcalc::{ast::Stmt, interpreter::checker::TypeChecker, parse};
///
/// let mut checker = TypeChecker::new(Vec::<Stmt>::new());
/// let diagnostics = parse("var x = 1\nout y\nout x", &mut checker);
///
/// assert_eq!(checker.next().len(), 2);
/// assert_eq!(diagnostics.errors()[0].message(),
///            "Variable 'y' referenced before declaration");
/// ```
#[derive(Debug)]
pub struct TypeChecker<C> {
    next:      C,
    variables: Variables,
    globals:   Scope<'static>,
}

impl<C: StmtConsumer> TypeChecker<C> {
    /// Creates a checker that forwards to `next`.
    pub fn new(next: C) -> Self {
        Self { next,
               variables: Variables::default(),
               globals: Scope::global() }
    }

    /// The consumer statements are forwarded to.
    pub const fn next(&self) -> &C {
        &self.next
    }

    pub fn into_next(self) -> C {
        self.next
    }

    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Checks a single statement.
    ///
    /// The right-hand side of an assignment is checked before its name is
    /// declared, so `var x = x` refers to an undeclared `x`.
    pub fn check_stmt(&mut self, stmt: &Stmt, diagnostics: &mut Diagnostics) -> CheckResult<()> {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let ty = self.variables.check_expr(value, &self.globals, diagnostics)?;
                if self.globals.declares(&target.name) {
                    diagnostics.error(target,
                                      TypeError::AlreadyDeclared { name: target.name.clone() });
                    return Err(Rejected);
                }
                let id = self.variables.declare(target, ty);
                self.globals.declare(target.name.clone(), id);
            },
            StmtKind::Out(expr) => {
                self.variables.check_expr(expr, &self.globals, diagnostics)?;
            },
            StmtKind::Print(_) => {},
        }
        Ok(())
    }
}

impl<C: StmtConsumer> StmtConsumer for TypeChecker<C> {
    fn consume_stmt(&mut self, stmt: Stmt, diagnostics: &mut Diagnostics) {
        if self.check_stmt(&stmt, diagnostics).is_ok() {
            self.next.consume_stmt(stmt, diagnostics);
        } else {
            tracing::debug!(start = %stmt.span.start, "dropping ill-typed statement");
        }
    }
}
