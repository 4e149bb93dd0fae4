use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Number of significant digits used when rendering reals.
///
/// Matches the precision of the host engines that embed scripts, so that
/// `3.2 - 2.1` prints `1.1` instead of `1.1000000000000001`.
pub const DISPLAY_SIGNIFICANT_DIGITS: i32 = 15;

/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Widens an integer to a real for mixed arithmetic.
///
/// Values beyond `2^53` lose precision exactly as they would in the host
/// engine; promotion never fails.
///
/// ## Example
/// ```
/// use hostbasic::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(42), 42.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Converts a real to an integer if it is finite, integral and in range.
///
/// Used to normalize array keys, so that `A[1.0]` and `A[1]` address the same
/// slot.
///
/// ## Example
/// ```
/// use hostbasic::util::num::integral_f64_to_i64;
///
/// assert_eq!(integral_f64_to_i64(4.0), Some(4));
/// assert_eq!(integral_f64_to_i64(4.5), None);
/// assert_eq!(integral_f64_to_i64(f64::NAN), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn integral_f64_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < -(MAX_SAFE_I64_INT as f64) || value > MAX_SAFE_I64_INT as f64 {
        return None;
    }
    Some(value as i64)
}

/// Safely converts a `usize` count to an `i64` script integer.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the count does not fit.
///
/// ## Example
/// ```
/// use hostbasic::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(3, 1).unwrap(), 3);
/// ```
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { line })
}

/// Renders a real the way scripts display it.
///
/// At most [`DISPLAY_SIGNIFICANT_DIGITS`] significant digits are kept and
/// trailing zeros of the fraction are dropped, including the decimal point
/// when nothing remains after it.
///
/// ## Example
/// ```
/// use hostbasic::util::num::format_real;
///
/// assert_eq!(format_real(3.2 - 2.1), "1.1");
/// assert_eq!(format_real(6.0), "6");
/// assert_eq!(format_real(-0.25), "-0.25");
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let precision = (DISPLAY_SIGNIFICANT_DIGITS - 1 - magnitude).max(0) as usize;
    let rendered = format!("{value:.precision$}");

    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
