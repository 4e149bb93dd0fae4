use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during execution.
pub enum RuntimeError {
    /// No subroutine, native function or built-in is registered under the
    /// name with this many arguments.
    #[error("Error on line {line}: Unknown subroutine '{name}' taking {arity} argument(s).")]
    UnknownCallable {
        /// The name of the callable.
        name:  String,
        /// The number of arguments supplied at the call site.
        arity: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An operand could not be coerced for the operation.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division or remainder by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value cannot be used as an array key.
    #[error("Error on line {line}: Invalid array key: {details}.")]
    InvalidArrayKey {
        /// Why the key was rejected.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `FOR` loop was given a zero step.
    #[error("Error on line {line}: FOR loop STEP must not be zero.")]
    InvalidLoopStep {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Subroutine calls nested deeper than the configured limit.
    #[error("Error on line {line}: Recursion limit of {limit} calls exceeded.")]
    RecursionLimit {
        /// The configured maximum call depth.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A loop ran more iterations than the configured limit.
    #[error("Error on line {line}: Loop exceeded {limit} iterations.")]
    LoopLimit {
        /// The configured maximum iteration count.
        limit: u64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A host native function reported a failure.
    #[error("Error on line {line}: Native function '{name}' failed: {message}.")]
    NativeFailure {
        /// The name of the native function.
        name:    String,
        /// The message supplied by the host.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An `ABORT` statement is unwinding the run.
    ///
    /// This never escapes `Program::execute`, which reports it as
    /// `Completion::Aborted`.
    #[error("Error on line {line}: Program aborted.")]
    Aborted {
        /// The line of the `ABORT` statement.
        line: usize,
    },
}

impl RuntimeError {
    /// Builds a failure a native callback can return to the script.
    ///
    /// The name and line are filled in by the dispatcher.
    ///
    /// # Example
    /// ```
    /// use hostbasic::error::RuntimeError;
    ///
    /// let err = RuntimeError::native("stat id must be a string");
    /// assert!(matches!(err, RuntimeError::NativeFailure { .. }));
    /// ```
    #[must_use]
    pub fn native(message: impl Into<String>) -> Self {
        Self::NativeFailure { name:    String::new(),
                              message: message.into(),
                              line:    0, }
    }

    /// Returns the source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownCallable { line, .. }
            | Self::TypeError { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line }
            | Self::InvalidArrayKey { line, .. }
            | Self::InvalidLoopStep { line }
            | Self::RecursionLimit { line, .. }
            | Self::LoopLimit { line, .. }
            | Self::NativeFailure { line, .. }
            | Self::Aborted { line } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors raised while populating a context's native registry.
pub enum RegistrationError {
    /// A native with the same name and arity is already registered.
    #[error("Native function '{name}' with {arity} parameter(s) is already registered.")]
    DuplicateNative {
        /// The canonical (upper-case) name.
        name:  String,
        /// The number of parameters.
        arity: usize,
    },
}
