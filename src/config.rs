//! Matcher configuration: the recursion depth bound and the closed set of
//! caller-declared atomic value types.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::MatchError;
use crate::reflect::Reflect;

/// Default recursion depth bound. Input graphs are assumed acyclic; the bound
/// turns a cycle (or a pathologically deep graph) into a reported failure
/// instead of stack exhaustion.
pub const DEFAULT_MAX_DEPTH: usize = 256;

type EqThunk = fn(&dyn Reflect, &dyn Reflect) -> bool;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RegisteredType {
    pub(crate) name: &'static str,
    pub(crate) eq: EqThunk,
}

/// Closed registry of additional types treated as atomic immutable values.
///
/// Built-in scalars (integers, floats, `bool`, `char`, text) are always
/// atomic. Registering a type here extends that set: the engine compares
/// registered values with `==` and never polices reference identity on them,
/// exactly as for built-in scalars. The set is fixed once the matcher is
/// constructed.
#[derive(Clone, Default)]
pub struct ValueTypeSet {
    entries: HashMap<TypeId, RegisteredType>,
}

impl ValueTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `T` atomic. `T` must be comparable by content.
    pub fn register<T: Reflect + PartialEq>(&mut self) {
        fn eq_thunk<T: Reflect + PartialEq>(one: &dyn Reflect, two: &dyn Reflect) -> bool {
            match (
                (one as &dyn Any).downcast_ref::<T>(),
                (two as &dyn Any).downcast_ref::<T>(),
            ) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        self.entries.insert(
            TypeId::of::<T>(),
            RegisteredType {
                name: std::any::type_name::<T>(),
                eq: eq_thunk::<T>,
            },
        );
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn lookup(&self, type_id: TypeId) -> Option<&RegisteredType> {
        self.entries.get(&type_id)
    }
}

impl fmt::Debug for ValueTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&'static str> = self.entries.values().map(|r| r.name).collect();
        names.sort_unstable();
        f.debug_tuple("ValueTypeSet").field(&names).finish()
    }
}

/// Configuration for a [`Matcher`](crate::Matcher).
///
/// Cheap to clone; validated once at matcher construction.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Maximum recursion depth before a comparison is failed.
    pub max_depth: usize,
    /// Additional types treated as atomic immutable values.
    pub value_types: ValueTypeSet,
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder form of [`ValueTypeSet::register`].
    pub fn with_value_type<T: Reflect + PartialEq>(mut self) -> Self {
        self.value_types.register::<T>();
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_depth == 0 {
            return Err(MatchError::InvalidConfig(
                "max_depth must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            value_types: ValueTypeSet::new(),
        }
    }
}
