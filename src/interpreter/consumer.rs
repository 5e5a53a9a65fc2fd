use crate::{
    ast::{Expr, ExprKind, Stmt, StmtKind},
    diagnostics::Diagnostics,
    util::num::format_float,
};

/// Receives top-level statements one at a time.
///
/// The parser calls this once per successfully parsed statement. Pipeline
/// stages implement it and forward to the next stage, so a chain such as
/// type checker followed by interpreter processes each statement completely
/// before the next one is parsed.
pub trait StmtConsumer {
    /// Processes `stmt`, reporting any problem to `diagnostics`.
    fn consume_stmt(&mut self, stmt: Stmt, diagnostics: &mut Diagnostics);
}

impl<C: StmtConsumer + ?Sized> StmtConsumer for &mut C {
    fn consume_stmt(&mut self, stmt: Stmt, diagnostics: &mut Diagnostics) {
        (**self).consume_stmt(stmt, diagnostics);
    }
}

/// Collects the statements unchanged.
impl StmtConsumer for Vec<Stmt> {
    fn consume_stmt(&mut self, stmt: Stmt, _diagnostics: &mut Diagnostics) {
        self.push(stmt);
    }
}

/// Renders statements as indented s-expressions.
///
/// Expressions that already have a type are annotated with it, which makes
/// the printer useful both right after parsing and after type checking.
///
/// # Example
/// ```
/// use seqcalc::{interpreter::consumer::AstPrinter, parse};
///
/// let mut printer = AstPrinter::new();
/// let diagnostics = parse("out (1 + 2) * x", &mut printer);
///
/// assert!(diagnostics.is_empty());
/// assert_eq!(printer.output(),
///            "(out\n  (binary *\n    (paren\n      (binary +\n        (int 1)\n        (int \
///             2)\n      )\n    )\n    (ref x)\n  )\n)\n");
/// ```
#[derive(Debug, Default)]
pub struct AstPrinter {
    output:      String,
    indentation: usize,
}

impl AstPrinter {
    #[must_use]
    pub const fn new() -> Self {
        Self { output:      String::new(),
               indentation: 0, }
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indentation {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Prints `(header ...)` around whatever `children` prints.
    fn node(&mut self, header: &str, children: impl FnOnce(&mut Self)) {
        self.line(&format!("({header}"));
        self.indentation += 1;
        children(self);
        self.indentation -= 1;
        self.line(")");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                self.node(&format!("assign {}", target.name), |p| p.expr(value));
            },
            StmtKind::Out(expr) => self.node("out", |p| p.expr(expr)),
            StmtKind::Print(text) => self.line(&format!("(print {text:?})")),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        let mut header = match &expr.kind {
            ExprKind::IntLiteral(value) => format!("int {value}"),
            ExprKind::FloatLiteral(value) => format!("float {}", format_float(*value)),
            ExprKind::VariableRef { name, .. } => format!("ref {name}"),
            ExprKind::Binary { op, .. } => format!("binary {op}"),
            ExprKind::Paren(_) => "paren".to_string(),
            ExprKind::Range { .. } => "range".to_string(),
            ExprKind::Map { param, .. } => format!("map {}", param.name),
            ExprKind::Reduce { accumulator,
                               element,
                               .. } => format!("reduce {} {}", accumulator.name, element.name),
        };
        if let Some(ty) = expr.ty() {
            header.push_str(&format!(" : {ty}"));
        }

        match &expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::FloatLiteral(_) | ExprKind::VariableRef { .. } => {
                self.line(&format!("({header})"));
            },
            ExprKind::Binary { lhs, rhs, .. } => self.node(&header, |p| {
                                                      p.expr(lhs);
                                                      p.expr(rhs);
                                                  }),
            ExprKind::Paren(inner) => self.node(&header, |p| p.expr(inner)),
            ExprKind::Range { lower, upper } => self.node(&header, |p| {
                                                      p.expr(lower);
                                                      p.expr(upper);
                                                  }),
            ExprKind::Map { argument, body, .. } => self.node(&header, |p| {
                                                          p.expr(argument);
                                                          p.expr(body);
                                                      }),
            ExprKind::Reduce { sequence,
                               base,
                               body,
                               .. } => self.node(&header, |p| {
                                           p.expr(sequence);
                                           p.expr(base);
                                           p.expr(body);
                                       }),
        }
    }
}

impl StmtConsumer for AstPrinter {
    fn consume_stmt(&mut self, stmt: Stmt, _diagnostics: &mut Diagnostics) {
        self.stmt(&stmt);
    }
}
