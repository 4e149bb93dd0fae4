use std::sync::Arc;

use crate::{
    ast::{Statement, SubroutineDef, SubroutineTable},
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        lexer::tokenize,
        parser::core::parse_program,
    },
};

/// How a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every top-level statement ran, or a top-level `RETURN` ended the run.
    Finished,
    /// An `ABORT` statement stopped the run.
    Aborted {
        /// Line of the `ABORT` statement.
        line: usize,
    },
}

/// A parsed script.
///
/// A program is immutable once built. It holds the top-level statements and
/// the subroutines keyed by name and parameter count, and it can be shared
/// between threads and executed any number of times against different
/// contexts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    statements:  Vec<Statement>,
    subroutines: SubroutineTable,
}

impl Program {
    /// Parses source text into a program.
    ///
    /// # Errors
    /// The first syntax error, with the line it was found on.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::program::Program;
    ///
    /// let program = Program::parse("SUB ADD(A, B)\nRETURN A + B\nENDSUB\nX = ADD(1, 2)").unwrap();
    ///
    /// assert_eq!(program.statements().len(), 1);
    /// assert!(program.subroutine("add", 2).is_some());
    /// assert!(program.subroutine("add", 1).is_none());
    /// ```
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        let (statements, subroutines) = parse_program(&mut tokens.iter().peekable())?;
        tracing::debug!(statements = statements.len(),
                        subroutines = subroutines.len(),
                        "parsed program");
        Ok(Self { statements,
                  subroutines })
    }

    /// Returns the top-level statements.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Returns every subroutine of the program.
    #[must_use]
    pub const fn subroutines(&self) -> &SubroutineTable {
        &self.subroutines
    }

    /// Looks up a subroutine by case-insensitive name and parameter count.
    #[must_use]
    pub fn subroutine(&self, name: &str, arity: usize) -> Option<&SubroutineDef> {
        self.subroutines
            .get(&(name.to_ascii_uppercase(), arity))
            .map(Arc::as_ref)
    }

    /// Runs the top-level statements against a context.
    ///
    /// The program's subroutines are installed into the context first, so
    /// they stay callable from the host afterwards. Frames left over from an
    /// earlier failed run are discarded. Runtime errors are passed to the
    /// context's error hook before being returned.
    ///
    /// # Errors
    /// The first runtime error raised by a statement.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{Completion, Context, parse};
    ///
    /// let program = parse("PRINT \"before\" : ABORT : PRINT \"after\"").unwrap();
    /// let mut ctx = Context::new();
    /// ctx.on_print(|_| {});
    ///
    /// assert_eq!(program.execute(&mut ctx).unwrap(), Completion::Aborted { line: 1 });
    /// ```
    #[tracing::instrument(level = "debug", skip_all, fields(statements = self.statements.len()))]
    pub fn execute(&self, ctx: &mut Context) -> EvalResult<Completion> {
        ctx.reset_frames();
        ctx.subroutines
           .extend(self.subroutines.iter().map(|(key, def)| (key.clone(), Arc::clone(def))));

        let result = match ctx.exec_block(&self.statements) {
            Ok(Flow::Continue | Flow::Return(_)) => Ok(Completion::Finished),
            Ok(Flow::Abort { line }) | Err(RuntimeError::Aborted { line }) => {
                Ok(Completion::Aborted { line })
            },
            Err(err) => Err(err),
        };
        ctx.reset_frames();

        match &result {
            Ok(completion) => tracing::debug!(?completion, "run finished"),
            Err(err) => {
                tracing::debug!(%err, "run failed");
                (ctx.hooks.error)(err.to_string().as_str());
            },
        }
        result
    }

    /// Runs the program against a fresh default context.
    ///
    /// # Errors
    /// The first runtime error raised by a statement.
    pub fn execute_default(&self) -> EvalResult<Completion> {
        self.execute(&mut Context::new())
    }
}
