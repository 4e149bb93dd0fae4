use std::collections::HashMap;

use crate::{
    ast::SubroutineKey,
    error::{RegistrationError, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Variant,
    },
};

/// A host function as stored in the registry.
///
/// It receives exactly as many arguments as it was registered for.
pub type NativeFn = Box<dyn FnMut(&[Variant]) -> EvalResult<Variant>>;

/// Host natives keyed by canonical name and arity.
#[derive(Default)]
pub struct NativeRegistry {
    entries: HashMap<SubroutineKey, NativeFn>,
}

impl NativeRegistry {
    /// Returns the number of registered natives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a native is registered under the key.
    #[must_use]
    pub fn contains(&self, key: &SubroutineKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn get_mut(&mut self, key: &SubroutineKey) -> Option<&mut NativeFn> {
        self.entries.get_mut(key)
    }

    fn insert(&mut self, name: &str, arity: usize, native: NativeFn) -> Result<(), RegistrationError> {
        let key = (name.to_ascii_uppercase(), arity);
        if self.entries.contains_key(&key) {
            return Err(RegistrationError::DuplicateNative { name:  key.0,
                                                            arity: key.1, });
        }
        tracing::debug!(name = %key.0, arity, "registered native");
        self.entries.insert(key, native);
        Ok(())
    }
}

/// Conversion of a native's return type into a script value.
///
/// Implemented for the types a host closure may return: [`Variant`], `()`,
/// `bool`, `i64`, `f64`, `String` and `Result<Variant, RuntimeError>`.
pub trait NativeReturn {
    /// Converts the value, keeping an error as the call's failure.
    ///
    /// # Errors
    /// Only the `Result` implementation fails, with the error it holds.
    fn into_result(self) -> EvalResult<Variant>;
}

impl NativeReturn for Variant {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(self)
    }
}

impl NativeReturn for () {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(Variant::Empty)
    }
}

impl NativeReturn for bool {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(Variant::Bool(self))
    }
}

impl NativeReturn for i64 {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(Variant::Integer(self))
    }
}

impl NativeReturn for f64 {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(Variant::Real(self))
    }
}

impl NativeReturn for String {
    fn into_result(self) -> EvalResult<Variant> {
        Ok(Variant::Str(self))
    }
}

impl NativeReturn for EvalResult<Variant> {
    fn into_result(self) -> EvalResult<Variant> {
        self
    }
}

/// A closure that can be registered as a native function.
///
/// Implemented for every `FnMut` taking 0 to 6 [`Variant`] parameters and
/// returning a [`NativeReturn`] type. `Args` is the tuple of parameter types
/// and only serves to keep the implementations apart; the arity is read from
/// it.
pub trait NativeCallback<Args>: 'static {
    /// Number of parameters of the closure.
    const ARITY: usize;

    /// Boxes the closure behind the uniform slice-taking signature.
    fn into_native(self) -> NativeFn;
}

macro_rules! native_callback {
    (@variant $arg:ident) => { Variant };
    ($arity:literal $(, $arg:ident)*) => {
        impl<F, R> NativeCallback<($(native_callback!(@variant $arg),)*)> for F
            where F: FnMut($(native_callback!(@variant $arg)),*) -> R + 'static,
                  R: NativeReturn
        {
            const ARITY: usize = $arity;

            fn into_native(mut self) -> NativeFn {
                Box::new(move |args: &[Variant]| {
                    let [$($arg),*] = args else {
                        return Err(RuntimeError::native(format!("expected {} argument(s), got {}",
                                                                $arity,
                                                                args.len())));
                    };
                    self($($arg.clone()),*).into_result()
                })
            }
        }
    };
}

native_callback!(0);
native_callback!(1, a);
native_callback!(2, a, b);
native_callback!(3, a, b, c);
native_callback!(4, a, b, c, d);
native_callback!(5, a, b, c, d, e);
native_callback!(6, a, b, c, d, e, f);

impl Context {
    /// Registers a host function under `name` with the closure's arity.
    ///
    /// The same name may be registered once per arity, which is how
    /// getter/setter pairs such as `STAT(id)` and `STAT(id, value)` are
    /// built. Closure parameters must be annotated as [`Variant`] so the arity
    /// can be read from the signature.
    ///
    /// # Errors
    /// `DuplicateNative` if `(name, arity)` is already registered.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{Context, Variant, run};
    ///
    /// let mut ctx = Context::new();
    /// ctx.register("DOUBLE", |x: Variant| -> Variant {
    ///        match x {
    ///            Variant::Integer(n) => Variant::Integer(n * 2),
    ///            other => other,
    ///        }
    ///    })
    ///    .unwrap()
    ///    .register("ANSWER", || 42_i64)
    ///    .unwrap();
    ///
    /// run("X = DOUBLE(ANSWER())", &mut ctx).unwrap();
    /// assert_eq!(ctx.global("X"), Some(&Variant::Integer(84)));
    /// ```
    pub fn register<Args, F>(&mut self,
                             name: &str,
                             callback: F)
                             -> Result<&mut Self, RegistrationError>
        where F: NativeCallback<Args>
    {
        self.natives
            .insert(name, F::ARITY, callback.into_native())?;
        Ok(self)
    }

    /// Registers a host function taking its arguments as a slice.
    ///
    /// Useful when the arity is only known at runtime. The callback is only
    /// ever invoked with exactly `arity` arguments.
    ///
    /// # Errors
    /// `DuplicateNative` if `(name, arity)` is already registered.
    pub fn register_raw(&mut self,
                        name: &str,
                        arity: usize,
                        callback: impl FnMut(&[Variant]) -> EvalResult<Variant> + 'static)
                        -> Result<&mut Self, RegistrationError> {
        self.natives.insert(name, arity, Box::new(callback))?;
        Ok(self)
    }

    /// Returns `true` if a native is registered under `name` and `arity`.
    #[must_use]
    pub fn has_native(&self, name: &str, arity: usize) -> bool {
        self.natives.contains(&(name.to_ascii_uppercase(), arity))
    }
}
