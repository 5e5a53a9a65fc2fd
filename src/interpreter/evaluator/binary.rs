use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{evaluator::core::Activation, value::Value},
    util::num::int_to_float,
};

impl Activation {
    /// Applies `op` to two evaluated operands.
    ///
    /// Two ints stay an int, except for a division that leaves a remainder
    /// and for a negative exponent; both promote to float. Any float operand
    /// makes the result a float. Errors are reported over the whole binary
    /// expression; an operand that already is the error value yields the error
    /// value without a new diagnostic.
    pub(super) fn eval_binary(&mut self,
                              expr: &Expr,
                              op: BinaryOperator,
                              lhs: Value,
                              rhs: Value)
                              -> Value {
        let result = match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(op, a, b),
            (Value::Int(a), Value::Float(b)) => float_op(op, int_to_float(a), b.0),
            (Value::Float(a), Value::Int(b)) => float_op(op, a.0, int_to_float(b)),
            (Value::Float(a), Value::Float(b)) => float_op(op, a.0, b.0),
            _ => return Value::Error,
        };

        result.unwrap_or_else(|error| {
                  self.diagnostics.error(expr, error);
                  Value::Error
              })
    }
}

fn int_op(op: BinaryOperator, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let value = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Div => return int_div(a, b),
        BinaryOperator::Pow => return int_pow(a, b),
    };
    value.map(Value::Int).ok_or(RuntimeError::Overflow { op })
}

fn int_div(a: i64, b: i64) -> Result<Value, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    match a.checked_rem(b) {
        Some(0) => a.checked_div(b)
                    .map(Value::Int)
                    .ok_or(RuntimeError::Overflow { op: BinaryOperator::Div }),
        Some(_) => Ok(Value::float(int_to_float(a) / int_to_float(b))),
        // i64::MIN / -1
        None => Err(RuntimeError::Overflow { op: BinaryOperator::Div }),
    }
}

fn int_pow(base: i64, exponent: i64) -> Result<Value, RuntimeError> {
    if exponent < 0 {
        return Ok(Value::float(int_to_float(base).powf(int_to_float(exponent))));
    }
    let overflow = RuntimeError::Overflow { op: BinaryOperator::Pow };
    match u32::try_from(exponent) {
        Ok(exponent) => base.checked_pow(exponent).map(Value::Int).ok_or(overflow),
        Err(_) => match base {
            0 | 1 => Ok(Value::Int(base)),
            -1 => Ok(Value::Int(if exponent % 2 == 0 { 1 } else { -1 })),
            _ => Err(overflow),
        },
    }
}

fn float_op(op: BinaryOperator, a: f64, b: f64) -> Result<Value, RuntimeError> {
    let value = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a / b
        },
        BinaryOperator::Pow => a.powf(b),
    };
    Ok(Value::float(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_division_stays_int() {
        assert_eq!(int_op(BinaryOperator::Div, 4, 2), Ok(Value::Int(2)));
        assert_eq!(int_op(BinaryOperator::Div, -9, 3), Ok(Value::Int(-3)));
    }

    #[test]
    fn uneven_division_promotes() {
        assert_eq!(int_op(BinaryOperator::Div, 1, 2), Ok(Value::float(0.5)));
        assert_eq!(int_op(BinaryOperator::Div, 7, -2), Ok(Value::float(-3.5)));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(int_op(BinaryOperator::Div, 1, 0), Err(RuntimeError::DivisionByZero));
        assert_eq!(float_op(BinaryOperator::Div, 1.0, 0.0), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn negative_exponent_promotes() {
        assert_eq!(int_op(BinaryOperator::Pow, 2, -1), Ok(Value::float(0.5)));
        assert_eq!(int_op(BinaryOperator::Pow, 2, 10), Ok(Value::Int(1024)));
    }

    #[test]
    fn huge_exponents() {
        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(int_op(BinaryOperator::Pow, 1, huge), Ok(Value::Int(1)));
        assert_eq!(int_op(BinaryOperator::Pow, -1, huge + 1), Ok(Value::Int(-1)));
        assert_eq!(int_op(BinaryOperator::Pow, 2, huge),
                   Err(RuntimeError::Overflow { op: BinaryOperator::Pow }));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert_eq!(int_op(BinaryOperator::Add, i64::MAX, 1),
                   Err(RuntimeError::Overflow { op: BinaryOperator::Add }));
        assert_eq!(int_op(BinaryOperator::Div, i64::MIN, -1),
                   Err(RuntimeError::Overflow { op: BinaryOperator::Div }));
    }

    #[test]
    fn mixed_operands_are_float() {
        assert_eq!(float_op(BinaryOperator::Add, int_to_float(1), 0.5), Ok(Value::float(1.5)));
        assert_eq!(float_op(BinaryOperator::Mul, 2.0, 3.0), Ok(Value::float(6.0)));
    }
}
