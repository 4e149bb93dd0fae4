use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Variant,
    },
};

/// One activation record.
///
/// The bottom frame holds the globals; each subroutine call pushes a fresh
/// frame, so subroutines see only their parameters and their own locals.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    pub(crate) variables:    HashMap<String, Variant>,
    pub(crate) return_value: Option<Variant>,
}

impl Frame {
    /// Iterates over every value held by the frame, including its return slot.
    fn values(&self) -> impl Iterator<Item = &Variant> {
        self.variables.values().chain(self.return_value.iter())
    }
}

impl Context {
    /// Returns the number of subroutine frames above the global frame.
    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Pushes a fresh frame for a subroutine call.
    ///
    /// # Errors
    /// `RecursionLimit` if the call would exceed `max_call_depth`.
    pub(crate) fn push_frame(&mut self, line: usize) -> EvalResult<()> {
        let limit = self.config.max_call_depth;
        if self.call_depth() >= limit {
            return Err(RuntimeError::RecursionLimit { limit, line });
        }
        self.frames.push(Frame::default());
        Ok(())
    }

    /// Pops the active frame and returns its return slot (`Empty` if unset).
    ///
    /// The global frame is never popped.
    pub(crate) fn pop_frame(&mut self) -> Variant {
        if self.frames.len() <= 1 {
            return Variant::Empty;
        }
        self.frames
            .pop()
            .and_then(|frame| frame.return_value)
            .unwrap_or_default()
    }

    /// Stores the return value of the active frame.
    pub(crate) fn set_return_value(&mut self, value: Variant) {
        if let Some(frame) = self.frames.last_mut() {
            frame.return_value = Some(value);
        }
    }

    /// Drops every frame above the global one.
    ///
    /// Used before a run so that a previous failure cannot leave stale frames
    /// behind.
    pub(crate) fn reset_frames(&mut self) {
        self.frames.truncate(1);
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
    }

    /// Looks up a variable in the active frame.
    #[must_use]
    pub fn find_variable(&self, name: &str) -> Option<&Variant> {
        self.frames.last().and_then(|frame| frame.variables.get(name))
    }

    /// Sets a variable in the active frame, creating it if needed.
    pub fn set_variable(&mut self, name: &str, value: Variant) {
        if let Some(frame) = self.frames.last_mut() {
            frame.variables.insert(name.to_string(), value);
        }
    }

    /// Sets a global variable visible to top-level statements.
    ///
    /// The name is case-insensitive.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{Context, Variant};
    ///
    /// let mut ctx = Context::new();
    /// ctx.set_global("level", Variant::Integer(3));
    ///
    /// assert_eq!(ctx.global("LEVEL"), Some(&Variant::Integer(3)));
    /// ```
    pub fn set_global(&mut self, name: &str, value: impl Into<Variant>) {
        if let Some(frame) = self.frames.first_mut() {
            frame.variables.insert(name.to_ascii_uppercase(), value.into());
        }
    }

    /// Reads a global variable. The name is case-insensitive.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<&Variant> {
        self.frames
            .first()
            .and_then(|frame| frame.variables.get(&name.to_ascii_uppercase()))
    }

    /// Removes a global variable and returns its value.
    pub fn remove_global(&mut self, name: &str) -> Option<Variant> {
        self.frames
            .first_mut()
            .and_then(|frame| frame.variables.remove(&name.to_ascii_uppercase()))
    }

    /// Reclaims every array that no frame can reach.
    ///
    /// Returns the number of arrays reclaimed.
    ///
    /// # Example
    /// ```
    /// use hostbasic::{Context, run};
    ///
    /// let mut ctx = Context::new();
    /// run("DIM A\nA[1] = 1\nDIM A", &mut ctx).unwrap();
    ///
    /// assert_eq!(ctx.collect_garbage(), 1);
    /// assert_eq!(ctx.arrays().live_count(), 1);
    /// ```
    pub fn collect_garbage(&mut self) -> usize {
        let reclaimed = self.arrays
                            .collect(self.frames.iter().flat_map(Frame::values));
        tracing::debug!(reclaimed, live = self.arrays.live_count(), "collected arrays");
        reclaimed
    }
}
