use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Variant,
    },
};

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator. Arithmetic (and concatenation when either side is a
    /// string) goes to `eval_scalar_op`, relational and equality operators use
    /// `eval_comparison`, and logical operators call `eval_logic`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Variant>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Variant},
    /// };
    ///
    /// let left = Variant::Integer(3);
    /// let right = Variant::Real(0.5);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right, 1);
    /// assert_eq!(result.unwrap(), Variant::Real(3.5));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Variant,
                       right: &Variant,
                       line: usize)
                       -> EvalResult<Variant> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub, Xor,
        };

        match op {
            Add | Sub | Mul | Div | Mod => Self::eval_scalar_op(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            And | Or | Xor => Ok(Self::eval_logic(op, left, right)),
        }
    }
}
