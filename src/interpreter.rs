/// The evaluator module executes AST nodes against a runtime context.
///
/// The evaluator walks statements and expressions, performs arithmetic,
/// comparison and logical operations, manages frames and arrays, dispatches
/// calls to subroutines and host natives, and reports runtime errors. It is
/// the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, arrays, subroutine calls and control flow.
/// - Reports runtime errors such as division by zero or unknown callables.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, operators, separators and keywords. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their source line.
/// - Handles numeric and string literals, identifiers, keywords and `REM`.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of statements and
/// expressions, registering subroutines along the way.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar and syntax, reporting errors with line info.
/// - Rejects duplicate and nested subroutine definitions.
pub mod parser;
/// Parsed programs and their execution entry point.
///
/// A `Program` is the immutable result of parsing; executing it against a
/// `Context` yields a `Completion` or a runtime error.
pub mod program;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the `Variant` type used during execution (empty,
/// integer, real, boolean, string and array handle) together with the array
/// arena. It provides methods for coercion, promotion and display.
///
/// # Responsibilities
/// - Defines the `Variant` enum and all supported value variants.
/// - Implements conversions, truthiness and rendering.
/// - Owns array storage and reclaims unreachable arrays.
pub mod value;
