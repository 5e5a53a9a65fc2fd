use std::{collections::BTreeMap, num::NonZeroUsize, sync::Arc};

use rayon::prelude::*;

use crate::{
    ast::{Expr, ExprKind, Stmt, StmtKind, VariableId},
    diagnostics::{Diagnostics, SourceLoc},
    interpreter::{
        consumer::StmtConsumer,
        value::{SequencePool, Value},
    },
};

/// Values of the variables visible to an activation, indexed by
/// [`VariableId`]. `None` marks a variable that is not bound here.
pub type Bindings = Vec<Option<Value>>;

/// Evaluator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Upper bound on the number of slices a bulk operator is split into.
    pub workers: NonZeroUsize,
}

impl Options {
    #[must_use]
    pub const fn with_workers(workers: NonZeroUsize) -> Self {
        Self { workers }
    }
}

impl Default for Options {
    /// One worker per thread of the global rayon pool.
    fn default() -> Self {
        let workers = NonZeroUsize::new(rayon::current_num_threads()).unwrap_or(NonZeroUsize::MIN);
        Self { workers }
    }
}

/// The state one thread evaluates expressions with.
///
/// The interpreter owns the root activation. Bulk operators fork one
/// activation per worker: a fork starts with a private copy of the bindings,
/// its own diagnostics buffer and its own buffer pool, so workers share
/// nothing mutable.
#[derive(Debug)]
pub struct Activation {
    pub(super) bindings:    Bindings,
    pub(super) diagnostics: Diagnostics,
    pub(super) pool:        SequencePool,
    pub(super) workers:     NonZeroUsize,
}

impl Activation {
    #[must_use]
    pub const fn new(options: &Options) -> Self {
        Self { bindings:    Vec::new(),
               diagnostics: Diagnostics::new(),
               pool:        SequencePool::new(),
               workers:     options.workers, }
    }

    /// Evaluates `expr`.
    ///
    /// Never fails: a failing subexpression reports its diagnostic and
    /// evaluates to [`Value::Error`], which every enclosing expression passes
    /// on without reporting again.
    pub fn eval(&mut self, expr: &Expr) -> Value {
        match &expr.kind {
            ExprKind::IntLiteral(value) => Value::Int(*value),
            ExprKind::FloatLiteral(value) => Value::float(*value),
            ExprKind::VariableRef { target, .. } => self.lookup(target.get().copied()),
            ExprKind::Binary { lhs, op, rhs } => {
                let lhs = self.eval(lhs);
                let rhs = self.eval(rhs);
                self.eval_binary(expr, *op, lhs, rhs)
            },
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::Range { lower, upper } => self.eval_range(expr, lower, upper),
            ExprKind::Map { argument,
                            param,
                            body, } => self.eval_map(argument, param, body),
            ExprKind::Reduce { sequence,
                               base,
                               accumulator,
                               element,
                               body, } => {
                self.eval_reduce(sequence, base, accumulator, element, body)
            },
        }
    }

    /// The value bound to `id`, or the error value for an unresolved or
    /// unbound variable.
    fn lookup(&self, id: Option<VariableId>) -> Value {
        id.and_then(|id| self.bindings.get(id.index()))
          .and_then(Clone::clone)
          .unwrap_or(Value::Error)
    }

    pub(super) fn bind(&mut self, id: VariableId, value: Value) {
        let index = id.index();
        if index >= self.bindings.len() {
            self.bindings.resize_with(index + 1, || None);
        }
        self.bindings[index] = Some(value);
    }

    pub(super) fn unbind(&mut self, id: VariableId) {
        if let Some(slot) = self.bindings.get_mut(id.index()) {
            *slot = None;
        }
    }

    /// Takes the diagnostics reported so far, leaving the buffer empty.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    fn fork(&self) -> Self {
        Self { bindings:    self.bindings.clone(),
               diagnostics: Diagnostics::new(),
               pool:        SequencePool::new(),
               workers:     self.workers, }
    }

    /// Runs `task` once per chunk, each on its own forked activation, and
    /// waits for all of them.
    ///
    /// Results come back in chunk order. Diagnostics the workers reported are
    /// appended in chunk order too, so they do not depend on scheduling.
    pub(super) fn fork_join<C, R>(&mut self,
                                  chunks: Vec<C>,
                                  task: impl Fn(&mut Self, C) -> R + Sync)
                                  -> Vec<R>
        where C: Send,
              R: Send
    {
        let this = &*self;
        let joined: Vec<(R, Diagnostics)> = chunks.into_par_iter()
                                                  .map(|chunk| {
                                                      let mut worker = this.fork();
                                                      let result = task(&mut worker, chunk);
                                                      (result, worker.diagnostics)
                                                  })
                                                  .collect();

        joined.into_iter()
              .map(|(result, mut diagnostics)| {
                  self.diagnostics.append(&mut diagnostics);
                  result
              })
              .collect()
    }
}

/// Evaluates type-checked statements and records their output.
///
/// `out` and `print` statements add an entry keyed by the start of the
/// statement; assignments bind their variable and add nothing.
///
/// # Example
/// ```
/// use seqcalc::{interpreter::evaluator::{Interpreter, Options}, type_check};
///
/// let mut interpreter = Interpreter::new(&Options::default());
/// let diagnostics = type_check("var x = 4\nout x / 2", &mut interpreter);
///
/// assert!(diagnostics.is_empty());
/// let output: Vec<_> = interpreter.output().values().map(ToString::to_string).collect();
/// assert_eq!(output, ["2"]);
/// ```
#[derive(Debug)]
pub struct Interpreter {
    activation: Activation,
    output:     BTreeMap<SourceLoc, Value>,
}

impl Interpreter {
    #[must_use]
    pub const fn new(options: &Options) -> Self {
        Self { activation: Activation::new(options),
               output:     BTreeMap::new(), }
    }

    #[must_use]
    pub const fn output(&self) -> &BTreeMap<SourceLoc, Value> {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> BTreeMap<SourceLoc, Value> {
        self.output
    }

    /// Executes one statement, reporting runtime errors to the root
    /// activation's diagnostics.
    pub fn execute(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let value = self.activation.eval(value);
                match target.id() {
                    Some(id) => self.activation.bind(id, value),
                    None => tracing::warn!(name = %target.name, "assignment to unchecked binding"),
                }
            },
            StmtKind::Out(expr) => {
                let value = self.activation.eval(expr);
                self.output.insert(stmt.span.start, value);
            },
            StmtKind::Print(text) => {
                self.output.insert(stmt.span.start, Value::String(Arc::from(text.as_str())));
            },
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl StmtConsumer for Interpreter {
    #[tracing::instrument(level = "debug", skip_all, fields(start = %stmt.span.start))]
    fn consume_stmt(&mut self, stmt: Stmt, diagnostics: &mut Diagnostics) {
        self.execute(&stmt);
        diagnostics.append(&mut self.activation.take_diagnostics());
    }
}
