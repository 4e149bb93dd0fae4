/// Parsing of `IF`/`FOR`/`WHILE`/`SUB` bodies.
///
/// Collects statements until one of the keywords that closes the enclosing
/// construct, skipping statement separators along the way.
pub mod block;
/// Core parser entry points.
///
/// Defines the parse result type, the expression entry point and the program
/// level loop that registers subroutines by name and arity.
pub mod core;
/// Binary operator precedence levels.
///
/// Implements the left-associative chain from logical `OR`/`XOR` down to
/// multiplicative operators.
pub mod binary;
/// Statement parsing.
///
/// Parses every statement form: `LET`, implicit assignment, `DIM`, `PRINT`,
/// `IF`, `FOR`, `WHILE`, `SUB`, `RETURN`, `CALL`, `COMMAND`, `ABORT` and `REM`.
pub mod statement;
/// Unary, postfix and primary expressions.
///
/// Handles negation, `NOT`, array indexing, literals, variables, calls and
/// parenthesized groups.
pub mod unary;
/// Small shared helpers for the parser.
///
/// Comma-separated lists, identifiers, expected tokens and statement ends.
pub mod utils;
