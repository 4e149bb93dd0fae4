/// Built-in functions.
///
/// `LEN` and `HAS`, which need access to the array arena.
pub mod builtin;

/// Call resolution and subroutine invocation.
pub mod core;

/// Host native functions.
///
/// The registry, the typed-closure adapters for arities 0 to 6 and the
/// registration API.
pub mod native;
