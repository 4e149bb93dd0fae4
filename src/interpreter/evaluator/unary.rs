use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Variant,
    },
};

impl Context {
    /// Applies a unary operator to an evaluated operand.
    ///
    /// - `Negate` coerces the operand to a number and flips its sign.
    /// - `Not` returns the boolean inverse of the operand's truthiness.
    ///
    /// # Errors
    /// - `TypeError` when negating a value that is not numeric.
    /// - `Overflow` when negating `i64::MIN`.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Variant},
    /// };
    ///
    /// let negated = Context::eval_unary(UnaryOperator::Negate, &"4".into(), 1).unwrap();
    /// assert_eq!(negated, Variant::Integer(-4));
    ///
    /// let inverted = Context::eval_unary(UnaryOperator::Not, &Variant::Empty, 1).unwrap();
    /// assert_eq!(inverted, Variant::Bool(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Variant, line: usize) -> EvalResult<Variant> {
        match op {
            UnaryOperator::Negate => match value.as_numeric(line)? {
                Variant::Integer(n) => n.checked_neg()
                                        .map(Variant::Integer)
                                        .ok_or(RuntimeError::Overflow { line }),
                Variant::Real(r) => Ok(Variant::Real(-r)),
                other => {
                    Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                   other.type_name()),
                                                  line })
                },
            },
            UnaryOperator::Not => Ok(Variant::Bool(!value.is_truthy())),
        }
    }
}
