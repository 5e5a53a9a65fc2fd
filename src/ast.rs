use std::{fmt, sync::OnceLock};

use crate::diagnostics::Span;

/// The static type of an expression.
///
/// The lattice has two cases: every number (integer or float) types as
/// `Number`, and a sequence carries the type of its elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Number,
    Sequence(Box<Self>),
}

impl Type {
    /// Builds `Sequence<element>`.
    #[must_use]
    pub fn sequence(element: Self) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// The element type if `self` is a sequence.
    ///
    /// # Example
    /// ```
    /// use seqcalc::ast::Type;
    ///
    /// let ty = Type::sequence(Type::Number);
    /// assert_eq!(ty.element(), Some(&Type::Number));
    /// assert_eq!(Type::Number.element(), None);
    /// ```
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Sequence(element) => Some(element),
            Self::Number => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "Number"),
            Self::Sequence(element) => write!(f, "Sequence<{element}>"),
        }
    }
}

/// Index of a variable in the type checker's variable arena.
///
/// Two variables may share a name (a lambda parameter shadowing a global) but
/// never an id. The interpreter addresses its bindings by this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(usize);

impl VariableId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A declared variable: its identity, its name and the type it was declared
/// with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub id:   VariableId,
    pub name: String,
    pub ty:   Type,
}

/// A declaration site: the left-hand side of `var` or a lambda parameter.
///
/// The parser only knows the name; the type checker allocates the variable
/// and records its id here exactly once.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub span: Span,
    id:       OnceLock<VariableId>,
}

impl Binding {
    #[must_use]
    pub const fn new(name: String, span: Span) -> Self {
        Self { name,
               span,
               id: OnceLock::new() }
    }

    /// The declared variable, once the type checker has seen this binding.
    #[must_use]
    pub fn id(&self) -> Option<VariableId> {
        self.id.get().copied()
    }

    pub(crate) fn declare(&self, id: VariableId) {
        let already = self.id.set(id).is_err();
        debug_assert!(!already, "binding '{}' declared twice", self.name);
    }
}

/// A binary arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
}

impl BinaryOperator {
    /// Binding strength of the operator; higher binds tighter.
    ///
    /// All operators are left-associative, so an operator only continues an
    /// expression whose precedence is strictly lower.
    ///
    /// # Example
    /// ```
    /// use seqcalc::ast::BinaryOperator;
    ///
    /// assert!(BinaryOperator::Pow.precedence() > BinaryOperator::Mul.precedence());
    /// assert_eq!(BinaryOperator::Add.precedence(), BinaryOperator::Sub.precedence());
    /// ```
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 3,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An expression node.
///
/// The type slot starts out empty and is filled exactly once by the type
/// checker. Everything downstream of the checker may rely on it being set.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    ty:       OnceLock<Type>,
}

/// The different kinds of expressions.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// An integer literal such as `42` or `-7`.
    IntLiteral(i64),
    /// A float literal such as `0.5`, `.5` or `3.`.
    FloatLiteral(f64),
    /// Reference to a variable by name.
    VariableRef {
        /// Name as written in the source.
        name:   String,
        /// The variable the name resolved to, set by the type checker.
        target: OnceLock<VariableId>,
    },
    /// `lhs op rhs`
    Binary {
        lhs: Box<Expr>,
        op:  BinaryOperator,
        rhs: Box<Expr>,
    },
    /// A parenthesized expression.
    Paren(Box<Expr>),
    /// The closed integer range `{lower, upper}`.
    Range {
        lower: Box<Expr>,
        upper: Box<Expr>,
    },
    /// `map(argument, param -> body)`
    Map {
        argument: Box<Expr>,
        param:    Binding,
        body:     Box<Expr>,
    },
    /// `reduce(sequence, base, accumulator element -> body)`
    ///
    /// `body` is assumed to be associative.
    Reduce {
        sequence:    Box<Expr>,
        base:        Box<Expr>,
        accumulator: Binding,
        element:     Binding,
        body:        Box<Expr>,
    },
}

impl Expr {
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind,
               span,
               ty: OnceLock::new() }
    }

    /// Creates an unresolved reference to `name`.
    #[must_use]
    pub const fn variable_ref(name: String, span: Span) -> Self {
        Self::new(ExprKind::VariableRef { name,
                                          target: OnceLock::new() },
                  span)
    }

    /// The type assigned by the type checker, if it already ran.
    #[must_use]
    pub fn ty(&self) -> Option<&Type> {
        self.ty.get()
    }

    pub(crate) fn assign_type(&self, ty: Type) {
        let already = self.ty.set(ty).is_err();
        debug_assert!(!already, "expression type assigned twice");
    }
}

impl From<&Expr> for Span {
    fn from(expr: &Expr) -> Self {
        expr.span
    }
}

impl From<&Binding> for Span {
    fn from(binding: &Binding) -> Self {
        binding.span
    }
}

/// A top-level statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `var target = value`
    Assign { target: Binding, value: Expr },
    /// `out expr`
    Out(Expr),
    /// `print "text"`
    Print(String),
}

impl From<&Stmt> for Span {
    fn from(stmt: &Stmt) -> Self {
        stmt.span
    }
}
