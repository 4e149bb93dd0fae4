use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all syntax errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered, or a description of what was expected.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string literal was opened but never closed on the same line.
    #[error("Error on line {line}: Unterminated string literal.")]
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The lexer met a character that starts no token.
    #[error("Error on line {line}: Invalid character '{found}'.")]
    InvalidCharacter {
        /// The offending source text.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Two subroutines share the same name and parameter count.
    #[error("Error on line {line}: Subroutine '{name}' with {arity} parameter(s) is already defined.")]
    DuplicateSubroutine {
        /// The name of the subroutine.
        name:  String,
        /// The number of parameters.
        arity: usize,
        /// The source line of the second definition.
        line:  usize,
    },
    /// A `SUB` appeared inside a block instead of at the top level.
    #[error("Error on line {line}: SUB may only be declared at the top level.")]
    NestedSubroutine {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of an assignment is not a variable or indexed variable.
    #[error("Error on line {line}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `NEXT` names a different variable than the enclosing `FOR`.
    #[error("Error on line {line}: NEXT {found} does not match FOR {expected}.")]
    MismatchedNext {
        /// The loop variable of the enclosing `FOR`.
        expected: String,
        /// The variable named after `NEXT`.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A numeric literal does not fit the numeric types.
    #[error("Error on line {line}: Literal is too large.")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Expressions or blocks are nested deeper than the parser accepts.
    #[error("Error on line {line}: Expression or block nesting is too deep.")]
    NestingTooDeep {
        /// The source line where the limit was crossed.
        line: usize,
    },
}

impl ParseError {
    /// Returns the source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line }
            | Self::UnterminatedString { line }
            | Self::InvalidCharacter { line, .. }
            | Self::DuplicateSubroutine { line, .. }
            | Self::NestedSubroutine { line }
            | Self::InvalidAssignmentTarget { line }
            | Self::MismatchedNext { line, .. }
            | Self::LiteralTooLarge { line }
            | Self::NestingTooDeep { line } => *line,
        }
    }
}
