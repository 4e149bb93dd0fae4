use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::array::ArrayHandle},
    util::num::{format_real, i64_to_f64, integral_f64_to_i64},
};

/// Represents a runtime value in the interpreter.
///
/// This enum models every value a script can hold: the result of an
/// expression, the content of a variable or array slot, an argument passed to
/// a subroutine or native function, and a return value.
///
/// Copying a `Variant` that holds an [`ArrayHandle`] copies the handle, not
/// the array, so both copies observe the same storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// The value of an unset variable, a missing array slot, or a call that
    /// returned nothing. Coerces to `0` in arithmetic and `""` in text.
    #[default]
    Empty,
    /// A integer value (64 bit integer).
    Integer(i64),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// A boolean value, displayed as `TRUE` or `FALSE`.
    Bool(bool),
    /// A string value.
    Str(String),
    /// A handle to an array owned by the execution context.
    Array(ArrayHandle),
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<ArrayHandle> for Variant {
    fn from(v: ArrayHandle) -> Self {
        Self::Array(v)
    }
}

impl From<&LiteralValue> for Variant {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(i) => (*i).into(),
            LiteralValue::Real(r) => (*r).into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Str(s) => s.as_str().into(),
        }
    }
}

impl Variant {
    /// Returns the name of the variant's type, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Coerces the value to a number, keeping integers integral.
    ///
    /// - `Empty` becomes `0`, booleans become `1` or `0`.
    /// - Strings holding a number are parsed; other strings are rejected.
    /// - Array handles are rejected.
    ///
    /// # Returns
    /// - `Ok(Variant::Integer | Variant::Real)`: The numeric value.
    /// - `Err(RuntimeError::TypeError)`: If the value is not numeric-ish.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::core::Variant;
    ///
    /// assert_eq!(Variant::from("12").as_numeric(1).unwrap(), Variant::Integer(12));
    /// assert_eq!(Variant::Bool(true).as_numeric(1).unwrap(), Variant::Integer(1));
    /// assert!(Variant::from("sword").as_numeric(1).is_err());
    /// ```
    pub fn as_numeric(&self, line: usize) -> EvalResult<Self> {
        match self {
            Self::Integer(_) | Self::Real(_) => Ok(self.clone()),
            Self::Empty => Ok(Self::Integer(0)),
            Self::Bool(b) => Ok(Self::Integer(i64::from(*b))),
            Self::Str(s) => parse_number(s).ok_or_else(|| RuntimeError::TypeError {
                details: format!("'{s}' is not a number"),
                line,
            }),
            Self::Array(_) => {
                Err(RuntimeError::TypeError { details: "an array cannot be used as a number".to_string(),
                                              line })
            },
        }
    }

    /// Converts the value to an `f64` after numeric coercion.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::core::Variant;
    ///
    /// assert_eq!(Variant::Integer(10).as_real(1).unwrap(), 10.0);
    /// ```
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self.as_numeric(line)? {
            Self::Real(r) => Ok(r),
            Self::Integer(n) => Ok(i64_to_f64(n)),
            other => Err(RuntimeError::TypeError { details: format!("{} is not a number",
                                                                   other.type_name()),
                                                   line }),
        }
    }

    /// Converts the value to an `i64` after numeric coercion.
    ///
    /// Reals are accepted only when they hold an integral value.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self.as_numeric(line)? {
            Self::Integer(n) => Ok(n),
            Self::Real(r) => integral_f64_to_i64(r).ok_or_else(|| RuntimeError::TypeError {
                details: format!("{} is not an integer", format_real(r)),
                line,
            }),
            other => Err(RuntimeError::TypeError { details: format!("{} is not a number",
                                                                   other.type_name()),
                                                   line }),
        }
    }

    /// Promotes both operands to numbers for mixed math.
    ///
    /// - If one side is an integer and the other is a real, the integer is
    ///   converted to a real.
    /// - Two integers stay integers.
    ///
    /// # Returns
    /// - `Ok((Self, Self))`: Promoted values, both `Integer` or both `Real`.
    /// - `Err(RuntimeError)`: If either side is not numeric.
    pub fn promote_to_real(&self, other: &Self, line: usize) -> EvalResult<(Self, Self)> {
        use Variant::{Integer, Real};

        match (self.as_numeric(line)?, other.as_numeric(line)?) {
            (Real(a), Integer(b)) => Ok((Real(a), Real(i64_to_f64(b)))),
            (Integer(a), Real(b)) => Ok((Real(i64_to_f64(a)), Real(b))),
            pair => Ok(pair),
        }
    }

    /// Converts the value to a condition.
    ///
    /// Booleans are taken as-is, numbers are true when non-zero, strings when
    /// non-empty and array handles are always true. `Empty` is false.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::core::Variant;
    ///
    /// assert!(Variant::Integer(3).is_truthy());
    /// assert!(!Variant::from("").is_truthy());
    /// assert!(!Variant::Empty.is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Integer(n) => *n != 0,
            Self::Real(r) => *r != 0.0,
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::Array(_) => true,
        }
    }

    /// Returns `true` if the value is [`Variant::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the value is [`Variant::Str`].
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(..))
    }

    /// Returns the array handle, if the value holds one.
    #[must_use]
    pub const fn as_array(&self) -> Option<ArrayHandle> {
        match self {
            Self::Array(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Parses script text as a number.
///
/// Integers are preferred; anything else that parses as a real becomes a real.
/// Surrounding whitespace is ignored.
#[must_use]
pub fn parse_number(text: &str) -> Option<Variant> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Variant::Integer(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(Variant::Real)
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(*r)),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(handle) => write!(f, "{handle}"),
        }
    }
}
