use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Variant,
    },
};

impl Context {
    /// Evaluates an arithmetic operation.
    ///
    /// `+` concatenates when either operand is a string. Otherwise both
    /// operands are coerced to numbers: two integers use checked integer math
    /// (division truncates), and any real operand promotes the other side to a
    /// real. Division and remainder by zero are checked explicitly for both
    /// numeric categories. The operator must be one of `Add`, `Sub`, `Mul`,
    /// `Div` or `Mod`.
    ///
    /// # Parameters
    /// - `op`: The arithmetic operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Variant>` containing the computed scalar.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` or `%` by zero.
    /// - `Overflow` when integer math leaves the `i64` range.
    /// - `TypeError` for operands that are not numeric.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Variant},
    /// };
    ///
    /// let x = Variant::Integer(7);
    /// let y = Variant::Integer(2);
    ///
    /// let result = Context::eval_scalar_op(BinaryOperator::Div, &x, &y, 1).unwrap();
    /// assert_eq!(result, Variant::Integer(3));
    ///
    /// let joined = Context::eval_scalar_op(BinaryOperator::Add, &"HP ".into(), &x, 1).unwrap();
    /// assert_eq!(joined, Variant::from("HP 7"));
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator,
                          left: &Variant,
                          right: &Variant,
                          line: usize)
                          -> EvalResult<Variant> {
        use BinaryOperator::{Add, Div, Mod, Mul, Sub};
        use Variant::{Integer, Real};

        if op == Add && (left.is_str() || right.is_str()) {
            return Ok(Variant::Str(format!("{left}{right}")));
        }

        match left.promote_to_real(right, line)? {
            (Integer(a), Integer(b)) => {
                let result = match op {
                    Add => a.checked_add(b),
                    Sub => a.checked_sub(b),
                    Mul => a.checked_mul(b),
                    Div | Mod if b == 0 => return Err(RuntimeError::DivisionByZero { line }),
                    Div => a.checked_div(b),
                    Mod => a.checked_rem(b),
                    _ => return Err(invalid_operator(op, line)),
                };
                result.map(Integer)
                      .ok_or(RuntimeError::Overflow { line })
            },
            (Real(a), Real(b)) => Ok(Real(match op {
                                              Add => a + b,
                                              Sub => a - b,
                                              Mul => a * b,
                                              Div | Mod if b == 0.0 => {
                                                  return Err(RuntimeError::DivisionByZero { line });
                                              },
                                              Div => a / b,
                                              Mod => a % b,
                                              _ => return Err(invalid_operator(op, line)),
                                          })),
            (l, r) => {
                Err(RuntimeError::TypeError { details: format!("Invalid scalar operands: {l} {op} {r}"),
                                              line })
            },
        }
    }
}

fn invalid_operator(op: BinaryOperator, line: usize) -> RuntimeError {
    RuntimeError::TypeError { details: format!("'{op}' is not an arithmetic operator"),
                              line }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinaryOperator, left: impl Into<Variant>, right: impl Into<Variant>) -> EvalResult<Variant> {
        Context::eval_scalar_op(op, &left.into(), &right.into(), 1)
    }

    #[test]
    fn mixed_operands_promote_to_real() {
        assert_eq!(apply(BinaryOperator::Add, 1_i64, 0.1).unwrap(), Variant::Real(1.1));
    }

    #[test]
    fn integer_math_stays_integral() {
        assert_eq!(apply(BinaryOperator::Mul, 2_i64, 3_i64).unwrap(), Variant::Integer(6));
        assert_eq!(apply(BinaryOperator::Mod, -7_i64, 3_i64).unwrap(), Variant::Integer(-1));
    }

    #[test]
    fn zero_divisors_are_rejected() {
        assert_eq!(apply(BinaryOperator::Div, 1_i64, 0_i64),
                   Err(RuntimeError::DivisionByZero { line: 1 }));
        assert_eq!(apply(BinaryOperator::Mod, 1.5, 0.0),
                   Err(RuntimeError::DivisionByZero { line: 1 }));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(apply(BinaryOperator::Add, i64::MAX, 1_i64),
                   Err(RuntimeError::Overflow { line: 1 }));
    }

    #[test]
    fn empty_coerces_to_zero() {
        assert_eq!(apply(BinaryOperator::Sub, Variant::Empty, 4_i64).unwrap(), Variant::Integer(-4));
    }

    #[test]
    fn numeric_strings_only_join() {
        assert_eq!(apply(BinaryOperator::Add, "1", 2_i64).unwrap(), Variant::from("12"));
        assert_eq!(apply(BinaryOperator::Mul, "3", 2_i64).unwrap(), Variant::Integer(6));
        assert!(apply(BinaryOperator::Mul, "sword", 2_i64).is_err());
    }
}
