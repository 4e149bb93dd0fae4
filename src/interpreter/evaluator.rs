/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions: arithmetic
/// with integer/real promotion, string concatenation, comparisons and logic.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, its configuration, the control-flow signal
/// and the expression dispatcher.
pub mod core;

/// Call frames.
///
/// Frame push/pop with return slots, variable lookup in the active frame,
/// host globals and array reclamation.
pub mod frame;

/// Host hooks.
///
/// Print, error, log and command callbacks installed by the embedding host.
pub mod hooks;

/// Statement execution.
///
/// Runs assignments, `DIM`, `PRINT`, `IF`, `WHILE`, `CALL`, `COMMAND`,
/// `RETURN`, `ABORT` and `REM`, propagating the flow signal through blocks.
pub mod statement;

/// Evaluation of `FOR` loops.
///
/// Evaluates the loop header once and steps the loop variable after each pass.
pub mod for_loop;

/// Call dispatch.
///
/// Resolves calls to subroutines, host natives and built-ins by name and
/// argument count.
pub mod function;
