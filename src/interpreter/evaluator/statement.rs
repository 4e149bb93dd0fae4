use crate::{
    ast::{Expr, Statement, Target},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::{
            array::{ArrayHandle, ArrayKey},
            core::Variant,
        },
    },
    util::stack::ensure_sufficient_stack,
};

impl Context {
    /// Runs statements in order.
    ///
    /// Stops at the first statement whose flow is not `Continue` and returns
    /// that flow to the enclosing construct.
    ///
    /// # Errors
    /// The first runtime error raised by a statement.
    pub fn exec_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec_statement(statement)? {
                Flow::Continue => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes a single statement.
    ///
    /// # Parameters
    /// - `statement`: Statement to execute.
    ///
    /// # Returns
    /// The control-flow signal for the enclosing block.
    ///
    /// # Errors
    /// Any `RuntimeError` raised while evaluating the statement.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| {
            match statement {
                Statement::Assignment { target,
                                        value,
                                        line, } => {
                    self.exec_assignment(target, value, *line)?;
                    Ok(Flow::Continue)
                },
                Statement::Dim { name, index, line } => {
                    self.exec_dim(name, index.as_ref(), *line)?;
                    Ok(Flow::Continue)
                },
                Statement::If { condition,
                                then_branch,
                                else_branch,
                                .. } => {
                    if self.eval(condition)?.is_truthy() {
                        self.exec_block(then_branch)
                    } else if let Some(else_branch) = else_branch {
                        self.exec_block(else_branch)
                    } else {
                        Ok(Flow::Continue)
                    }
                },
                Statement::While { condition,
                                   body,
                                   line, } => self.exec_while(condition, body, *line),
                Statement::For { context, line } => self.exec_for(context, *line),
                Statement::Return { value, .. } => {
                    let value = match value {
                        Some(expr) => self.eval(expr)?,
                        None => Variant::Empty,
                    };
                    Ok(Flow::Return(value))
                },
                Statement::Call { name,
                                  arguments,
                                  line, } => {
                    self.eval_call(name, arguments, *line)?;
                    Ok(Flow::Continue)
                },
                Statement::Print { arguments, .. } => {
                    let mut rendered = Vec::with_capacity(arguments.len());
                    for argument in arguments {
                        let value = self.eval(argument)?;
                        rendered.push(self.arrays.render(&value));
                    }
                    (self.hooks.print)(rendered.join(" ").as_str());
                    Ok(Flow::Continue)
                },
                Statement::Command { name,
                                     arguments,
                                     .. } => {
                    let args = arguments.iter()
                                        .map(|arg| self.eval(arg))
                                        .collect::<EvalResult<Vec<_>>>()?;
                    tracing::debug!(name = %name, arguments = args.len(), "forwarding command");
                    (self.hooks.command)(name.as_str(), args.as_slice());
                    Ok(Flow::Continue)
                },
                Statement::Abort { line } => Ok(Flow::Abort { line: *line }),
                Statement::Remark { text, .. } => {
                    (self.hooks.log)(text.as_str());
                    Ok(Flow::Continue)
                },
            }
        })
    }

    /// Runs a `WHILE` loop, re-evaluating the condition before each pass.
    fn exec_while(&mut self, condition: &Expr, body: &[Statement], line: usize) -> EvalResult<Flow> {
        let mut iterations = 0;
        while self.eval(condition)?.is_truthy() {
            self.count_iteration(&mut iterations, line)?;
            match self.exec_block(body)? {
                Flow::Continue => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    /// Stores a value into a variable or an array slot.
    ///
    /// Keys are evaluated before the value. Missing arrays along an indexed
    /// path are created, replacing whatever non-array value was there.
    fn exec_assignment(&mut self, target: &Target, value: &Expr, line: usize) -> EvalResult<()> {
        let keys = target.indices
                         .iter()
                         .map(|index| {
                             let key = self.eval(index)?;
                             ArrayKey::from_variant(&key, line)
                         })
                         .collect::<EvalResult<Vec<_>>>()?;
        let value = self.eval(value)?;

        let Some((last, path)) = keys.split_last() else {
            self.set_variable(&target.name, value);
            return Ok(());
        };

        let mut handle = self.ensure_array_variable(&target.name);
        for key in path {
            handle = self.ensure_nested_array(handle, key, line)?;
        }
        self.arrays.get_mut(handle, line)?.insert(last.clone(), value);
        Ok(())
    }

    /// Runs `DIM NAME` or `DIM NAME[key]`.
    ///
    /// Without a key the variable is bound to a fresh empty array. With a key
    /// the variable is made an array if needed and the key is removed.
    fn exec_dim(&mut self, name: &str, index: Option<&Expr>, line: usize) -> EvalResult<()> {
        let Some(index) = index else {
            let handle = self.arrays.allocate();
            self.set_variable(name, Variant::Array(handle));
            return Ok(());
        };

        let key = self.eval(index)?;
        let key = ArrayKey::from_variant(&key, line)?;
        let handle = self.ensure_array_variable(name);
        self.arrays.get_mut(handle, line)?.remove(&key);
        Ok(())
    }

    /// Returns the array held by a variable, binding a new one if it holds
    /// anything else.
    fn ensure_array_variable(&mut self, name: &str) -> ArrayHandle {
        if let Some(Variant::Array(handle)) = self.find_variable(name)
           && self.arrays.get(*handle).is_some()
        {
            return *handle;
        }
        let handle = self.arrays.allocate();
        self.set_variable(name, Variant::Array(handle));
        handle
    }

    /// Returns the array stored at `parent[key]`, creating it if needed.
    fn ensure_nested_array(&mut self,
                           parent: ArrayHandle,
                           key: &ArrayKey,
                           line: usize)
                           -> EvalResult<ArrayHandle> {
        if let Variant::Array(handle) = self.arrays.lookup(parent, key)
           && self.arrays.get(handle).is_some()
        {
            return Ok(handle);
        }
        let handle = self.arrays.allocate();
        self.arrays
            .get_mut(parent, line)?
            .insert(key.clone(), Variant::Array(handle));
        Ok(handle)
    }

    /// Counts one loop pass against `max_loop_iterations`.
    ///
    /// # Errors
    /// `LoopLimit` once the count exceeds the configured limit.
    pub(crate) fn count_iteration(&self, iterations: &mut u64, line: usize) -> EvalResult<()> {
        *iterations += 1;
        match self.config.max_loop_iterations {
            Some(limit) if *iterations > limit => {
                Err(RuntimeError::LoopLimit { limit, line })
            },
            _ => Ok(()),
        }
    }
}
