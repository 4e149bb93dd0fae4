//! # hostbasic
//!
//! hostbasic is an embeddable, line-oriented BASIC dialect for scripting game
//! logic from a host application. Scripts are parsed once into an immutable
//! [`Program`] and executed against a host-owned [`Context`] that carries
//! globals, arrays, native functions and output hooks between runs.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use hostbasic::{Context, Variant, parse};
//!
//! let program = parse(
//!     "SUB FIB(N)\n\
//!        IF N < 2 THEN RETURN N ENDIF\n\
//!        RETURN FIB(N - 1) + FIB(N - 2)\n\
//!      ENDSUB\n\
//!      PRINT \"fib\", FIB(6)",
//! ).unwrap();
//!
//! let out = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&out);
//! let mut ctx = Context::new();
//! ctx.on_print(move |line| sink.borrow_mut().push(line.to_string()));
//!
//! program.execute(&mut ctx).unwrap();
//! assert_eq!(*out.borrow(), ["fib 8"]);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types that
/// represent the syntactic structure of a script as a tree. The AST is built
/// by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Defines the subroutine registry keyed by name and arity.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// native registration or execution. Every error carries the source line it
/// refers to where one exists.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (parser, evaluator, registry).
/// - Attaches line numbers and detailed messages for context.
/// - Unifies them in a crate-level `Error` for the convenience API.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations, and exposes the program and context types the host
/// drives.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and values.
/// - Provides entry points for parsing and executing scripts.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides the conversions used throughout the interpreter
/// between `i64`, `usize` and `f64`, the rendering rule for reals, and the
/// stack growth guard for deep recursion.
pub mod util;

pub use crate::{
    error::{Error, ParseError, RegistrationError, RuntimeError},
    interpreter::{
        evaluator::core::{Context, ContextConfig},
        program::{Completion, Program},
        value::{array::ArrayHandle, core::Variant},
    },
};

/// Parses source text into an executable [`Program`].
///
/// # Errors
/// The first syntax error found in the source.
///
/// # Examples
/// ```
/// use hostbasic::{ParseError, parse};
///
/// assert!(parse("LET A = 2 : LET B = A * 2 : PRINT B").is_ok());
///
/// let err = parse("PRINT \"unterminated").unwrap_err();
/// assert_eq!(err, ParseError::UnterminatedString { line: 1 });
/// ```
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Program::parse(source)
}

/// Parses and executes source text against a context.
///
/// Convenience for hosts that do not keep the parsed program around. Syntax
/// errors are reported through the context's error hook, the same way
/// runtime errors are.
///
/// # Errors
/// Returns an error if parsing fails or a runtime error occurs.
///
/// # Examples
/// ```
/// use hostbasic::{Completion, Context, Error, run};
///
/// let mut ctx = Context::new();
/// ctx.on_error(|_| {});
///
/// assert_eq!(run("LET HP = 20 - (30 - 15)", &mut ctx).unwrap(), Completion::Finished);
/// assert!(matches!(run("LET HP = 1 / 0", &mut ctx), Err(Error::Runtime(_))));
/// assert!(matches!(run("LET HP = (1", &mut ctx), Err(Error::Syntax(_))));
/// ```
pub fn run(source: &str, ctx: &mut Context) -> Result<Completion, Error> {
    let program = Program::parse(source).inspect_err(|err| {
                                             tracing::debug!(line = err.line(), "syntax error");
                                             (ctx.hooks.error)(err.to_string().as_str());
                                         })?;
    Ok(program.execute(ctx)?)
}
