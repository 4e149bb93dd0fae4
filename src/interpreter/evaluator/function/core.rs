use crate::{
    ast::{Expr, SubroutineDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            function::builtin,
        },
        value::core::Variant,
    },
};

impl Context {
    /// Evaluates a call expression.
    ///
    /// Arguments are evaluated left to right before the callee is resolved.
    ///
    /// # Parameters
    /// - `name`: Canonical name of the callee.
    /// - `arguments`: Argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The value returned by the callee.
    pub(crate) fn eval_call(&mut self,
                            name: &str,
                            arguments: &[Expr],
                            line: usize)
                            -> EvalResult<Variant> {
        let args = arguments.iter()
                            .map(|arg| self.eval(arg))
                            .collect::<EvalResult<Vec<_>>>()?;
        self.call_at(name, args, line)
    }

    /// Calls a subroutine, native or built-in from the host.
    ///
    /// The name is case-insensitive. Resolution follows the same order as a
    /// call inside a script.
    ///
    /// # Errors
    /// `UnknownCallable` if nothing is registered under the name and argument
    /// count, or any error raised by the callee.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{Context, Variant, parse};
    ///
    /// let program = parse("SUB TWICE(N)\nRETURN N * 2\nENDSUB").unwrap();
    /// let mut ctx = Context::new();
    /// program.execute(&mut ctx).unwrap();
    ///
    /// let result = ctx.call("twice", vec![Variant::Integer(21)]).unwrap();
    /// assert_eq!(result, Variant::Integer(42));
    /// ```
    pub fn call(&mut self, name: &str, args: Vec<Variant>) -> EvalResult<Variant> {
        self.call_at(&name.to_ascii_uppercase(), args, 0)
    }

    /// Resolves a call by `(name, argument count)`.
    ///
    /// Subroutines come first, then host natives, then built-ins.
    fn call_at(&mut self, name: &str, args: Vec<Variant>, line: usize) -> EvalResult<Variant> {
        let key = (name.to_string(), args.len());

        if let Some(sub) = self.subroutines.get(&key).cloned() {
            return self.call_subroutine(&sub, args, line);
        }
        if let Some(native) = self.natives.get_mut(&key) {
            tracing::trace!(name, arity = args.len(), "calling native");
            return native(&args).map_err(|err| match err {
                                    RuntimeError::NativeFailure { message, .. } => {
                                        RuntimeError::NativeFailure { name: key.0.clone(),
                                                                      message,
                                                                      line }
                                    },
                                    other => other,
                                });
        }
        if let Some(builtin) = builtin::lookup(name, args.len()) {
            return builtin(self, &args, line);
        }

        Err(RuntimeError::UnknownCallable { name:  key.0,
                                            arity: key.1,
                                            line })
    }

    /// Executes a user-defined subroutine.
    ///
    /// A fresh frame is pushed and the parameters are bound to the arguments.
    /// The frame is popped again on every exit path, and its return slot
    /// becomes the result of the call.
    ///
    /// # Errors
    /// - `RecursionLimit` if the call would exceed the configured depth.
    /// - `Aborted` if the body runs `ABORT`.
    /// - Any error raised by the body.
    fn call_subroutine(&mut self,
                       sub: &SubroutineDef,
                       args: Vec<Variant>,
                       line: usize)
                       -> EvalResult<Variant> {
        self.push_frame(line)?;
        tracing::trace!(name = %sub.name, depth = self.call_depth(), "entering subroutine");

        for (param, arg) in sub.params.iter().zip(args) {
            self.set_variable(param, arg);
        }

        let flow = match self.exec_block(&sub.body) {
            Ok(flow) => flow,
            Err(err) => {
                self.pop_frame();
                return Err(err);
            },
        };

        match flow {
            Flow::Continue => {},
            Flow::Return(value) => self.set_return_value(value),
            Flow::Abort { line } => {
                self.pop_frame();
                return Err(RuntimeError::Aborted { line });
            },
        }
        Ok(self.pop_frame())
    }
}
