/// Numeric conversion helpers.
///
/// This module provides the conversions between script integers, reals and
/// host counts, plus the rendering rule for reals. Use these helpers wherever
/// a value crosses between `i64`, `usize` and `f64` so that every module
/// promotes and prints numbers the same way.
pub mod num;

/// Stack growth for the recursive parser and evaluator.
pub mod stack;
