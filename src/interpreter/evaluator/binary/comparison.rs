use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Variant, parse_number},
    },
};

impl Context {
    /// Evaluates a comparison and returns a boolean.
    ///
    /// Equality never fails: numbers compare after promotion, strings compare
    /// by content, a string equals a number only when it parses to that
    /// number, and arrays are equal only to the same handle.
    ///
    /// Ordering compares two strings lexicographically and everything else
    /// numerically.
    ///
    /// # Errors
    /// `TypeError` when ordering values that are not both strings and cannot
    /// both be coerced to numbers.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Variant},
    /// };
    ///
    /// let eq = Context::eval_comparison(BinaryOperator::Equal,
    ///                                   &Variant::Integer(1),
    ///                                   &Variant::Real(1.0),
    ///                                   1);
    /// assert_eq!(eq.unwrap(), Variant::Bool(true));
    ///
    /// let lt = Context::eval_comparison(BinaryOperator::Less, &"apple".into(), &"pear".into(), 1);
    /// assert_eq!(lt.unwrap(), Variant::Bool(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Variant,
                           right: &Variant,
                           line: usize)
                           -> EvalResult<Variant> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        let result = match op {
            Equal => loose_eq(left, right),
            NotEqual => !loose_eq(left, right),
            Less | Greater | LessEqual | GreaterEqual => {
                let ordering = compare(left, right, line)?;
                match op {
                    Less => ordering == Ordering::Less,
                    Greater => ordering == Ordering::Greater,
                    LessEqual => ordering != Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }
            },
            _ => {
                return Err(RuntimeError::TypeError { details: format!("'{op}' is not a comparison"),
                                                     line });
            },
        };
        Ok(Variant::Bool(result))
    }
}

/// Equality with numeric promotion; never fails.
fn loose_eq(left: &Variant, right: &Variant) -> bool {
    use Variant::{Array, Empty, Str};

    match (left, right) {
        (Str(a), Str(b)) => a == b,
        (Array(a), Array(b)) => a == b,
        (Array(_), _) | (_, Array(_)) => false,
        (Str(s), Empty) | (Empty, Str(s)) => s.is_empty(),
        (Str(s), other) | (other, Str(s)) => {
            parse_number(s).is_some_and(|number| numeric_eq(&number, other))
        },
        _ => numeric_eq(left, right),
    }
}

fn numeric_eq(left: &Variant, right: &Variant) -> bool {
    match left.promote_to_real(right, 0) {
        Ok((Variant::Integer(a), Variant::Integer(b))) => a == b,
        Ok((Variant::Real(a), Variant::Real(b))) => a == b,
        _ => false,
    }
}

/// Orders two values; strings lexicographically, everything else numerically.
fn compare(left: &Variant, right: &Variant, line: usize) -> EvalResult<Ordering> {
    if let (Variant::Str(a), Variant::Str(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    match left.promote_to_real(right, line)? {
        (Variant::Integer(a), Variant::Integer(b)) => Ok(a.cmp(&b)),
        (Variant::Real(a), Variant::Real(b)) => {
            a.partial_cmp(&b)
             .ok_or_else(|| RuntimeError::TypeError { details: "cannot order NaN".to_string(),
                                                      line })
        },
        (l, r) => {
            Err(RuntimeError::TypeError { details: format!("cannot order {} and {}",
                                                           l.type_name(),
                                                           r.type_name()),
                                          line })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_equal_numbers() {
        assert!(loose_eq(&"12".into(), &Variant::Integer(12)));
        assert!(!loose_eq(&"twelve".into(), &Variant::Integer(12)));
    }

    #[test]
    fn empty_equals_zero_and_empty_string() {
        assert!(loose_eq(&Variant::Empty, &Variant::Integer(0)));
        assert!(loose_eq(&Variant::Empty, &"".into()));
        assert!(!loose_eq(&Variant::Empty, &"x".into()));
    }

    #[test]
    fn ordering_mixes_integers_and_reals() {
        assert_eq!(compare(&Variant::Integer(2), &Variant::Real(2.5), 1).unwrap(),
                   Ordering::Less);
    }

    #[test]
    fn ordering_a_word_against_a_number_fails() {
        assert!(compare(&"sword".into(), &Variant::Integer(1), 1).is_err());
    }
}
