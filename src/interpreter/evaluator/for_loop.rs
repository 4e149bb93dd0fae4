use crate::{
    ast::{BinaryOperator, ForLoop},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Variant,
    },
};

impl Context {
    /// Executes a `FOR` loop.
    ///
    /// The start value is assigned to the loop variable once, and the bound and
    /// step are evaluated once. A positive step counts up while the variable is
    /// `<=` the bound; a negative step counts down while it is `>=` the bound.
    /// The variable is read back from the frame on every pass, so assignments
    /// to it inside the body are honoured.
    ///
    /// # Parameters
    /// - `context`: The loop header and body.
    /// - `line`: Line of the `FOR` keyword.
    ///
    /// # Returns
    /// `Flow::Continue` when the loop ends normally, or the first other flow
    /// produced by the body.
    ///
    /// # Errors
    /// - `InvalidLoopStep` for a zero step.
    /// - `TypeError` for non-numeric header values.
    /// - `LoopLimit` if the configured iteration limit is exceeded.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use hostbasic::{Context, run};
    ///
    /// let out = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&out);
    /// let mut ctx = Context::new();
    /// ctx.on_print(move |line| sink.borrow_mut().push(line.to_string()));
    ///
    /// run("FOR I = 3 TO 1 STEP -1 : PRINT I : NEXT", &mut ctx).unwrap();
    /// assert_eq!(*out.borrow(), ["3", "2", "1"]);
    /// ```
    pub fn exec_for(&mut self, context: &ForLoop, line: usize) -> EvalResult<Flow> {
        let start = self.eval(&context.start)?.as_numeric(line)?;
        self.set_variable(&context.var, start);

        let end = self.eval(&context.end)?.as_numeric(line)?;
        let step = match &context.step {
            Some(step) => self.eval(step)?.as_numeric(line)?,
            None => Variant::Integer(1),
        };

        let ascending = match step {
            Variant::Integer(n) if n != 0 => n > 0,
            Variant::Real(r) if r != 0.0 && !r.is_nan() => r > 0.0,
            _ => return Err(RuntimeError::InvalidLoopStep { line }),
        };
        let keep_going = if ascending {
            BinaryOperator::LessEqual
        } else {
            BinaryOperator::GreaterEqual
        };

        let mut iterations = 0;
        loop {
            let current = self.find_variable(&context.var)
                              .cloned()
                              .unwrap_or_default();
            if !Self::eval_comparison(keep_going, &current, &end, line)?.is_truthy() {
                break;
            }
            self.count_iteration(&mut iterations, line)?;

            match self.exec_block(&context.body)? {
                Flow::Continue => {},
                flow => return Ok(flow),
            }

            let current = self.find_variable(&context.var)
                              .cloned()
                              .unwrap_or_default();
            let next = Self::eval_scalar_op(BinaryOperator::Add, &current, &step, line)?;
            self.set_variable(&context.var, next);
        }
        Ok(Flow::Continue)
    }
}
