/// Comparison operators.
///
/// Equality with numeric promotion and string comparison, plus ordering.
pub mod comparison;
/// Operator routing.
pub mod core;
/// Logical `AND`, `OR` and `XOR` over truthiness.
pub mod logic;
/// Arithmetic and string concatenation.
///
/// Checked integer math, real math with promotion and `%`.
pub mod scalar;
