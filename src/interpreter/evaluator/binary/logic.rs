use crate::{
    ast::BinaryOperator,
    interpreter::{evaluator::core::Context, value::core::Variant},
};

impl Context {
    /// Evaluates a logical operator over the truthiness of both operands.
    ///
    /// Both operands are always evaluated by the caller; the result is a
    /// boolean.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Variant},
    /// };
    ///
    /// let result = Context::eval_logic(BinaryOperator::Xor, &Variant::Integer(1), &"".into());
    /// assert_eq!(result, Variant::Bool(true));
    /// ```
    #[must_use]
    pub fn eval_logic(op: BinaryOperator, left: &Variant, right: &Variant) -> Variant {
        let (l, r) = (left.is_truthy(), right.is_truthy());
        Variant::Bool(match op {
                          BinaryOperator::And => l && r,
                          BinaryOperator::Or => l || r,
                          _ => l != r,
                      })
    }
}
