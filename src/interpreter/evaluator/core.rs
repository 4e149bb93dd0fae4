use crate::{
    ast::{Expr, SubroutineTable},
    error::RuntimeError,
    interpreter::{
        evaluator::{frame::Frame, function::native::NativeRegistry, hooks::HostHooks},
        value::{
            array::{ArrayArena, ArrayKey},
            core::Variant,
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default maximum depth of nested subroutine calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Control-flow signal produced by executing a statement.
///
/// Blocks stop at the first signal other than `Continue` and hand it to their
/// enclosing construct: loops and branches pass it on, subroutine calls
/// consume `Return`, and the program runner turns `Abort` into a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Proceed with the next statement.
    Continue,
    /// Leave the current subroutine (or the program) with a value.
    Return(Variant),
    /// Stop the whole run.
    Abort {
        /// Line of the `ABORT` statement.
        line: usize,
    },
}

/// Runtime limits of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Maximum number of nested subroutine calls before `RecursionLimit`.
    pub max_call_depth:      usize,
    /// Maximum number of iterations of a single loop, if bounded.
    pub max_loop_iterations: Option<u64>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { max_call_depth:      DEFAULT_MAX_CALL_DEPTH,
               max_loop_iterations: None, }
    }
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the frame stack with the global
/// frame at the bottom, the subroutines of the running program, the host's
/// native functions, the array arena, the host hooks and the runtime limits.
///
/// ## Usage
///
/// A `Context` is created once by the host, configured with natives and hooks,
/// and reused across runs. Globals and arrays reachable from them persist
/// between runs.
///
/// ```
/// use hostbasic::{Context, Variant, run};
///
/// let mut ctx = Context::new();
/// run("LET GOLD = 10", &mut ctx).unwrap();
/// run("GOLD = GOLD + 5", &mut ctx).unwrap();
///
/// assert_eq!(ctx.global("gold"), Some(&Variant::Integer(15)));
/// ```
pub struct Context {
    pub(crate) frames:      Vec<Frame>,
    pub(crate) subroutines: SubroutineTable,
    pub(crate) natives:     NativeRegistry,
    pub(crate) arrays:      ArrayArena,
    pub(crate) hooks:       HostHooks,
    pub(crate) config:      ContextConfig,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
         .field("frames", &self.frames)
         .field("subroutines", &self.subroutines.len())
         .field("natives", &self.natives.len())
         .field("arrays", &self.arrays)
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a context with the default limits and hooks.
    ///
    /// Default hooks write `PRINT` output to stdout, errors to stderr and
    /// remarks to the `tracing` log.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Creates a context with custom runtime limits.
    #[must_use]
    pub fn with_config(config: ContextConfig) -> Self {
        Self { frames: vec![Frame::default()],
               subroutines: SubroutineTable::new(),
               natives: NativeRegistry::default(),
               arrays: ArrayArena::new(),
               hooks: HostHooks::default(),
               config }
    }

    /// Returns the runtime limits.
    #[must_use]
    pub const fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Returns the array arena, for inspecting arrays held by globals.
    #[must_use]
    pub const fn arrays(&self) -> &ArrayArena {
        &self.arrays
    }

    /// Returns the array arena for mutation, e.g. to build arrays for natives.
    pub const fn arrays_mut(&mut self) -> &mut ArrayArena {
        &mut self.arrays
    }

    /// Renders a value the way `PRINT` does, expanding arrays.
    #[must_use]
    pub fn render(&self, value: &Variant) -> String {
        self.arrays.render(value)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    /// The evaluator dispatches based on expression variant:
    /// literals, variables, array indexing, unary and binary operations, and
    /// calls. Operands are evaluated left to right.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression; unset variables read as `Empty`.
    ///
    /// # Errors
    /// Any `RuntimeError` raised by an operator or a call.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Variant> {
        ensure_sufficient_stack(|| {
            match expr {
                Expr::Literal { value, .. } => Ok(value.into()),
                Expr::Variable { name, .. } => Ok(self.find_variable(name).cloned().unwrap_or_default()),
                Expr::Index { target,
                              index,
                              line, } => {
                    let target = self.eval(target)?;
                    let key = self.eval(index)?;
                    self.eval_index(&target, &key, *line)
                },
                Expr::UnaryOp { op, expr, line } => {
                    let value = self.eval(expr)?;
                    Self::eval_unary(*op, &value, *line)
                },
                Expr::BinaryOp { left,
                                 op,
                                 right,
                                 line, } => {
                    let left = self.eval(left)?;
                    let right = self.eval(right)?;
                    Self::eval_binary(*op, &left, &right, *line)
                },
                Expr::Call { name,
                             arguments,
                             line, } => self.eval_call(name, arguments, *line),
            }
        })
    }

    /// Reads `target[key]`.
    ///
    /// Missing slots and indexing into `Empty` read as `Empty`; indexing any
    /// other non-array value is a type error.
    fn eval_index(&self, target: &Variant, key: &Variant, line: usize) -> EvalResult<Variant> {
        match target {
            Variant::Array(handle) => {
                let key = ArrayKey::from_variant(key, line)?;
                Ok(self.arrays.lookup(*handle, &key))
            },
            Variant::Empty => Ok(Variant::Empty),
            other => {
                Err(RuntimeError::TypeError { details: format!("cannot index a value of type {}",
                                                               other.type_name()),
                                              line })
            },
        }
    }
}
