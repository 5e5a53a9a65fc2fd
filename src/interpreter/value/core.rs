use std::{fmt, sync::Arc};

use ordered_float::OrderedFloat;

use crate::util::num::format_float;

/// Represents a runtime value in the interpreter.
///
/// Sequences share their elements through an `Arc`, so binding a sequence to
/// a variable or handing it to a worker never copies it. Whoever holds the
/// only reference may take the buffer back and reuse it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64 bit signed integer.
    Int(i64),
    /// A double precision float. Wrapped so values are `Eq` and `Hash`.
    Float(OrderedFloat<f64>),
    /// The text of a `print` statement.
    String(Arc<str>),
    /// An ordered sequence of values.
    Sequence(Arc<Vec<Self>>),
    /// The result of an expression whose evaluation failed. The failure has
    /// already been reported.
    Error,
}

impl Value {
    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self::Float(OrderedFloat(value))
    }

    #[must_use]
    pub fn sequence(values: Vec<Self>) -> Self {
        Self::Sequence(Arc::new(values))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Name of the runtime kind, as used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Sequence(_) => "Sequence",
            Self::Error => "Error",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::sequence(values)
    }
}

impl fmt::Display for Value {
    /// Ints print plainly, floats always with a fractional part, sequences
    /// as `{a, b, c}` and the error value as `<error>`.
    ///
    /// # Example
    /// ```
    /// use seqcalc::interpreter::value::Value;
    ///
    /// let value = Value::from(vec![Value::Int(2), Value::float(0.5), Value::float(3.0)]);
    /// assert_eq!(value.to_string(), "{2, 0.5, 3.0}");
    /// assert_eq!(Value::Error.to_string(), "<error>");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{}", format_float(x.0)),
            Self::String(s) => write!(f, "{s}"),
            Self::Sequence(values) => {
                write!(f, "{{")?;

                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "}}")
            },
            Self::Error => write!(f, "<error>"),
        }
    }
}
