use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: unexpected tokens, unterminated strings, duplicate subroutine
/// signatures and similar problems detected before execution.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during execution, along with
/// the registration errors raised while binding native functions.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::{RegistrationError, RuntimeError};

/// Any failure surfaced by the convenience entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The source text did not parse.
    #[error(transparent)]
    Syntax(#[from] ParseError),
    /// Execution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A native function could not be registered.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}
