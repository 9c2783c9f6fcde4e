//! The per-type capability the matching engine is polymorphic over.
//!
//! There is no runtime field enumeration in Rust, so every type that takes
//! part in a deep-copy comparison exposes its runtime shape through
//! [`Reflect::shape`]. Implementations for scalars, strings, smart pointers,
//! and the std containers live here; user composites and fieldless enums get
//! theirs from [`reflect_struct!`](crate::reflect_struct) and
//! [`reflect_enum!`](crate::reflect_enum).

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

/// Capability the engine uses to walk a value graph.
///
/// `Any` gives the engine type identity (the "are these the same runtime
/// type" check and registered-value-type downcasts); `Debug` provides the
/// rendering used in mismatch messages.
pub trait Reflect: Any + fmt::Debug {
    /// The runtime shape of this value.
    fn shape(&self) -> Shape<'_>;

    /// Name reported in type-mismatch diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runtime shape of a reflected value.
#[derive(Debug)]
pub enum Shape<'a> {
    /// An absent value (`Option::None`).
    Null,
    /// A transparent wrapper (`Some`, `Box`, `Rc`, `Arc`); the engine unwraps
    /// these before dispatching, so sharing through them is policed at the
    /// referent.
    Delegate(&'a dyn Reflect),
    /// An atomic value compared by content; sharing is harmless.
    Scalar(ScalarValue<'a>),
    /// A fieldless enum constant; equal variants are a valid copy.
    Variant(&'static str),
    /// A fixed-size array, compared index by index per element kind.
    Array(ArrayItems<'a>),
    /// A key-to-value mapping.
    Map(Vec<MapEntry<'a>>),
    /// A grouping of values in iteration order. Ordered groupings compare
    /// positionally; unordered ones by multiset matching.
    Collection {
        ordered: bool,
        items: Vec<&'a dyn Reflect>,
    },
    /// A plain composite compared field by field in declaration order.
    Composite(Vec<Field<'a>>),
    /// A value that refuses structural inspection; carries the reason,
    /// which the engine surfaces as a failure rather than an abort.
    Opaque(&'static str),
}

/// A named member of a composite value.
#[derive(Debug)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a dyn Reflect,
}

/// A single map entry; the key is pre-rendered for `get(key)` path segments
/// and lookup on the opposite side.
#[derive(Debug)]
pub struct MapEntry<'a> {
    pub key: String,
    pub value: &'a dyn Reflect,
}

/// Array contents, split by element kind.
#[derive(Debug)]
pub enum ArrayItems<'a> {
    I64(&'a [i64]),
    I32(&'a [i32]),
    F64(&'a [f64]),
    F32(&'a [f32]),
    Bool(&'a [bool]),
    U8(&'a [u8]),
    Object(Vec<&'a dyn Reflect>),
}

/// Normalized content of a built-in atomic value.
///
/// Integers are widened so one variant covers every width of a signedness;
/// the engine's runtime-type check runs first, so an `i32` never reaches a
/// content comparison against an `i64`.
#[derive(Debug, Clone, Copy)]
pub enum ScalarValue<'a> {
    Int(i128),
    UInt(u128),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Str(&'a str),
}

impl PartialEq for ScalarValue<'_> {
    /// Content equality. Floats compare by bit pattern, so a copied NaN
    /// matches its source and `0.0` does not match `-0.0`.
    fn eq(&self, other: &Self) -> bool {
        use ScalarValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident as $wide:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(ScalarValue::$variant(*self as $wide))
            }
        }
    )*};
}

impl_scalar! {
    i8 => Int as i128,
    i16 => Int as i128,
    i32 => Int as i128,
    i64 => Int as i128,
    i128 => Int as i128,
    isize => Int as i128,
    u8 => UInt as u128,
    u16 => UInt as u128,
    u32 => UInt as u128,
    u64 => UInt as u128,
    u128 => UInt as u128,
    usize => UInt as u128,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

impl Reflect for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(ScalarValue::Bool(*self))
    }
}

impl Reflect for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(ScalarValue::Char(*self))
    }
}

impl Reflect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(ScalarValue::Str(self))
    }
}

impl Reflect for &'static str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(ScalarValue::Str(*self))
    }
}

/// `Some` delegates to its contents and `None` reflects as the null shape,
/// so option nesting flattens: `Some(None)` and `None` are the same absence,
/// and only the innermost present value takes part in the match.
impl<T: Reflect> Reflect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => Shape::Delegate(value),
            None => Shape::Null,
        }
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Delegate(&**self)
    }
}

impl<T: Reflect> Reflect for Rc<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Delegate(&**self)
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Delegate(&**self)
    }
}

/// Boxed slices play the role of object arrays: index-by-index comparison
/// with `[i]` path segments, any element type.
impl<T: Reflect> Reflect for Box<[T]> {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(ArrayItems::Object(
            self.iter().map(|v| v as &dyn Reflect).collect(),
        ))
    }
}

macro_rules! impl_primitive_array {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl<const N: usize> Reflect for [$ty; N] {
            fn shape(&self) -> Shape<'_> {
                Shape::Array(ArrayItems::$variant(self))
            }
        }
    )*};
}

impl_primitive_array! {
    i64 => I64,
    i32 => I32,
    f64 => F64,
    f32 => F32,
    bool => Bool,
    u8 => U8,
}

impl<T: Reflect> Reflect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Collection {
            ordered: true,
            items: self.iter().map(|v| v as &dyn Reflect).collect(),
        }
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Collection {
            ordered: true,
            items: self.iter().map(|v| v as &dyn Reflect).collect(),
        }
    }
}

/// Sorted iteration order makes positional comparison exact for `BTreeSet`.
impl<T: Reflect> Reflect for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Collection {
            ordered: true,
            items: self.iter().map(|v| v as &dyn Reflect).collect(),
        }
    }
}

/// Hash iteration order is seeded per process, so `HashSet` is matched as a
/// multiset rather than positionally.
impl<T: Reflect + Eq + Hash> Reflect for HashSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Collection {
            ordered: false,
            items: self.iter().map(|v| v as &dyn Reflect).collect(),
        }
    }
}

/// Entries are keyed by the `Display` rendering of the key, both for lookup
/// on the opposite side and for `get(key)` path segments. Renderings must be
/// injective over the map's keys; keys that render identically alias one
/// entry.
impl<K, V> Reflect for HashMap<K, V>
where
    K: fmt::Display + fmt::Debug + Eq + Hash + 'static,
    V: Reflect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| MapEntry {
                    key: k.to_string(),
                    value: v as &dyn Reflect,
                })
                .collect(),
        )
    }
}

/// Same rendered-key contract as the `HashMap` impl.
impl<K, V> Reflect for BTreeMap<K, V>
where
    K: fmt::Display + fmt::Debug + Ord + 'static,
    V: Reflect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| MapEntry {
                    key: k.to_string(),
                    value: v as &dyn Reflect,
                })
                .collect(),
        )
    }
}
