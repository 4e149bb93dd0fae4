use crate::{
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{array::ArrayKey, core::Variant},
    },
    util::num::usize_to_i64_checked,
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the context (for array access), a slice of evaluated
/// argument values and the line number.
type BuiltinFn = fn(&Context, &[Variant], usize) -> EvalResult<Variant>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a name,
/// - the exact argument count,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: usize,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every built-in function.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "LEN" => { arity: 1, func: len },
    "HAS" => { arity: 2, func: has },
}

/// Finds the builtin registered under `name` and `arity`.
pub(crate) fn lookup(name: &str, arity: usize) -> Option<BuiltinFn> {
    BUILTIN_TABLE.iter()
                 .find(|b| b.name == name && b.arity == arity)
                 .map(|b| b.func)
}

/// Returns the length of a value.
///
/// - Arrays report their number of entries.
/// - Strings report their number of characters.
/// - `Empty` reports `0`.
/// - Anything else reports the length of its display text.
///
/// # Example
/// ```
/// use hostbasic::{Context, Variant, run};
///
/// let mut ctx = Context::new();
/// run("DIM BAG\nBAG[1] = \"rope\"\nBAG[2] = \"torch\"\nN = LEN(BAG)\nW = LEN(BAG[2])",
///     &mut ctx).unwrap();
///
/// assert_eq!(ctx.global("N"), Some(&Variant::Integer(2)));
/// assert_eq!(ctx.global("W"), Some(&Variant::Integer(5)));
/// ```
fn len(ctx: &Context, args: &[Variant], line: usize) -> EvalResult<Variant> {
    let count = match &args[0] {
        Variant::Array(handle) => ctx.arrays.len(*handle),
        Variant::Str(s) => s.chars().count(),
        Variant::Empty => 0,
        other => other.to_string().chars().count(),
    };
    usize_to_i64_checked(count, line).map(Variant::Integer)
}

/// Returns whether an array holds a key; non-arrays hold nothing.
///
/// # Example
/// ```
/// use hostbasic::{Context, Variant, run};
///
/// let mut ctx = Context::new();
/// run("MEMO[3] = 2\nA = HAS(MEMO, 3)\nB = HAS(MEMO, 4)\nC = HAS(NOTHING, 1)",
///     &mut ctx).unwrap();
///
/// assert_eq!(ctx.global("A"), Some(&Variant::Bool(true)));
/// assert_eq!(ctx.global("B"), Some(&Variant::Bool(false)));
/// assert_eq!(ctx.global("C"), Some(&Variant::Bool(false)));
/// ```
fn has(ctx: &Context, args: &[Variant], line: usize) -> EvalResult<Variant> {
    let Variant::Array(handle) = &args[0] else {
        return Ok(Variant::Bool(false));
    };
    let key = ArrayKey::from_variant(&args[1], line)?;
    Ok(Variant::Bool(ctx.arrays.contains_key(*handle, &key)))
}
