use std::collections::{BTreeMap, HashSet};

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Variant},
    util::num::{format_real, integral_f64_to_i64},
};

/// Stable reference to an array stored in an [`ArrayArena`].
///
/// Copying a handle aliases the same storage, which is how arrays passed to
/// subroutines stay shared with the caller. A handle also records the
/// generation of its slot, so a handle kept past a collection never resolves
/// to an array that later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayHandle {
    index:      usize,
    generation: u32,
}

impl ArrayHandle {
    /// Returns the arena slot this handle points at.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ArrayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.generation == 0 {
            write!(f, "ARRAY#{}", self.index)
        } else {
            write!(f, "ARRAY#{}.{}", self.index, self.generation)
        }
    }
}

/// A key of an array slot.
///
/// Keys are ordered so that arrays iterate and render deterministically:
/// booleans, then integers, then reals, then strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    /// A boolean key.
    Bool(bool),
    /// An integer key; integral reals normalize to this variant.
    Integer(i64),
    /// A fractional real key.
    Real(OrderedFloat<f64>),
    /// A string key.
    Str(String),
}

impl ArrayKey {
    /// Builds a key from a script value.
    ///
    /// Integral reals become integer keys, so `A[1.0]` and `A[1]` name the
    /// same slot.
    ///
    /// # Errors
    /// `InvalidArrayKey` for `Empty`, array handles and NaN.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::{array::ArrayKey, core::Variant};
    ///
    /// assert_eq!(ArrayKey::from_variant(&Variant::Real(2.0), 1).unwrap(),
    ///            ArrayKey::Integer(2));
    /// assert!(ArrayKey::from_variant(&Variant::Empty, 1).is_err());
    /// ```
    pub fn from_variant(value: &Variant, line: usize) -> EvalResult<Self> {
        match value {
            Variant::Integer(n) => Ok(Self::Integer(*n)),
            Variant::Real(r) if r.is_nan() => {
                Err(RuntimeError::InvalidArrayKey { details: "NaN cannot be a key".to_string(),
                                                    line })
            },
            Variant::Real(r) => {
                Ok(integral_f64_to_i64(*r).map_or(Self::Real(OrderedFloat(*r)), Self::Integer))
            },
            Variant::Bool(b) => Ok(Self::Bool(*b)),
            Variant::Str(s) => Ok(Self::Str(s.clone())),
            Variant::Empty | Variant::Array(_) => {
                Err(RuntimeError::InvalidArrayKey { details: format!("a value of type {} cannot be a key",
                                                                     value.type_name()),
                                                    line })
            },
        }
    }

    /// Converts the key back into a script value.
    #[must_use]
    pub fn to_variant(&self) -> Variant {
        match self {
            Self::Bool(b) => Variant::Bool(*b),
            Self::Integer(n) => Variant::Integer(*n),
            Self::Real(r) => Variant::Real(r.0),
            Self::Str(s) => Variant::Str(s.clone()),
        }
    }
}

impl std::fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(r.0)),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// The contents of one array.
pub type ArrayStorage = BTreeMap<ArrayKey, Variant>;

/// One arena slot; the generation advances each time the slot is reclaimed.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    storage:    Option<ArrayStorage>,
}

/// Owns every array created during execution.
///
/// Arrays are addressed by [`ArrayHandle`]s that stay valid until the array
/// is reclaimed by [`ArrayArena::collect`]. Reclaimed slots are reused by
/// later allocations under a new generation, so stale handles read as
/// reclaimed instead of aliasing the new array.
#[derive(Debug, Default)]
pub struct ArrayArena {
    slots: Vec<Slot>,
    free:  Vec<usize>,
}

impl ArrayArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new empty array and returns its handle.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::array::ArrayArena;
    ///
    /// let mut arena = ArrayArena::new();
    /// let a = arena.allocate();
    /// let b = arena.allocate();
    ///
    /// assert_ne!(a, b);
    /// assert_eq!(arena.live_count(), 2);
    /// ```
    pub fn allocate(&mut self) -> ArrayHandle {
        if let Some(index) = self.free.pop()
           && let Some(slot) = self.slots.get_mut(index)
        {
            slot.storage = Some(ArrayStorage::new());
            return ArrayHandle { index,
                                 generation: slot.generation };
        }
        self.slots.push(Slot { generation: 0,
                               storage:    Some(ArrayStorage::new()), });
        ArrayHandle { index:      self.slots.len() - 1,
                      generation: 0, }
    }

    /// Returns the storage behind a handle, or `None` if it was reclaimed.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::array::ArrayArena;
    ///
    /// let mut arena = ArrayArena::new();
    /// let stale = arena.allocate();
    /// arena.collect([]);
    /// let fresh = arena.allocate();
    ///
    /// assert_eq!(stale.index(), fresh.index());
    /// assert!(arena.get(stale).is_none());
    /// assert!(arena.get(fresh).is_some());
    /// ```
    #[must_use]
    pub fn get(&self, handle: ArrayHandle) -> Option<&ArrayStorage> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.storage.as_ref())
    }

    /// Returns the storage behind a handle for mutation.
    ///
    /// # Errors
    /// `TypeError` if the handle was reclaimed.
    pub fn get_mut(&mut self, handle: ArrayHandle, line: usize) -> EvalResult<&mut ArrayStorage> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.storage.as_mut())
            .ok_or_else(|| RuntimeError::TypeError { details: format!("{handle} is no longer alive"),
                                                     line })
    }

    /// Reads a slot; missing keys and reclaimed arrays read as `Empty`.
    #[must_use]
    pub fn lookup(&self, handle: ArrayHandle, key: &ArrayKey) -> Variant {
        self.get(handle)
            .and_then(|storage| storage.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns `true` if the array holds the key.
    #[must_use]
    pub fn contains_key(&self, handle: ArrayHandle, key: &ArrayKey) -> bool {
        self.get(handle)
            .is_some_and(|storage| storage.contains_key(key))
    }

    /// Returns the number of entries of an array (`0` once reclaimed).
    #[must_use]
    pub fn len(&self, handle: ArrayHandle) -> usize {
        self.get(handle).map_or(0, BTreeMap::len)
    }

    /// Returns the number of arrays currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.storage.is_some())
            .count()
    }

    /// Reclaims every array not reachable from `roots`.
    ///
    /// Reachability follows handles stored inside arrays, so nested arrays
    /// survive as long as their parent does. Stale roots keep nothing alive.
    /// Returns the number of arrays reclaimed.
    pub fn collect<'a>(&mut self, roots: impl IntoIterator<Item = &'a Variant>) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut pending: Vec<ArrayHandle> = roots.into_iter().filter_map(Variant::as_array).collect();

        while let Some(handle) = pending.pop() {
            let Some(storage) = self.get(handle) else { continue };
            let Some(seen) = marked.get_mut(handle.index) else { continue };
            if *seen {
                continue;
            }
            *seen = true;
            pending.extend(storage.values().filter_map(Variant::as_array));
        }

        let mut reclaimed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.storage.is_some() && !marked[index] {
                slot.storage = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Renders a value for display, expanding arrays into `{key: value, ...}`.
    ///
    /// Arrays that contain themselves render the inner occurrence as `{...}`.
    ///
    /// # Example
    /// ```
    /// use hostbasic::interpreter::value::{
    ///     array::{ArrayArena, ArrayKey},
    ///     core::Variant,
    /// };
    ///
    /// let mut arena = ArrayArena::new();
    /// let handle = arena.allocate();
    /// arena.get_mut(handle, 1)
    ///      .unwrap()
    ///      .insert(ArrayKey::Integer(1), Variant::from("one"));
    ///
    /// assert_eq!(arena.render(&Variant::Array(handle)), "{1: one}");
    /// assert_eq!(arena.render(&Variant::Real(2.5)), "2.5");
    /// ```
    #[must_use]
    pub fn render(&self, value: &Variant) -> String {
        let mut visiting = HashSet::new();
        let mut out = String::new();
        self.render_into(value, &mut visiting, &mut out);
        out
    }

    fn render_into(&self, value: &Variant, visiting: &mut HashSet<ArrayHandle>, out: &mut String) {
        let Variant::Array(handle) = value else {
            out.push_str(&value.to_string());
            return;
        };
        let Some(storage) = self.get(*handle) else {
            out.push_str(&handle.to_string());
            return;
        };
        if !visiting.insert(*handle) {
            out.push_str("{...}");
            return;
        }

        out.push('{');
        for (index, (key, item)) in storage.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&key.to_string());
            out.push_str(": ");
            self.render_into(item, visiting, out);
        }
        out.push('}');

        visiting.remove(handle);
    }
}
