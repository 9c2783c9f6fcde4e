//! The recursive matching engine.
//!
//! One [`Matcher`] per assertion run: `matches` walks both value graphs
//! depth-first, dispatching on the runtime shape of each pair and threading
//! the path tracker through every recursive call. The first divergence wins;
//! there is no aggregation and no continuing past a failure.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::ptr;

use tracing::{debug, trace};

use crate::config::MatcherConfig;
use crate::error::MatchError;
use crate::outcome::MatchOutcome;
use crate::path::{PathSegment, PathTracker};
use crate::reflect::{ArrayItems, Field, MapEntry, Reflect, Shape};

/// Recursive deep-copy matcher.
///
/// The matcher owns one [`PathTracker`] for the duration of a single
/// [`matches`](Matcher::matches) call; `&mut self` makes concurrent reuse of
/// one instance impossible by construction. The tracker is reset at the start
/// of every top-level call, so an instance may be reused sequentially.
pub struct Matcher {
    config: MatcherConfig,
    path: PathTracker,
}

impl Matcher {
    /// Matcher with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
            path: PathTracker::new(),
        }
    }

    /// Matcher with an explicit, validated configuration.
    pub fn with_config(config: MatcherConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            config,
            path: PathTracker::new(),
        })
    }

    /// Compares `copy` against `source` and reports whether it is a true
    /// deep copy: every reachable atomic value equal by content, and no
    /// reachable mutable node the identical instance on both sides.
    pub fn matches(&mut self, source: &dyn Reflect, copy: &dyn Reflect) -> MatchOutcome {
        self.path.reset();
        trace!(source_type = source.type_name(), "deep copy match started");
        self.match_pair(source, copy, 0)
    }

    fn match_pair(&mut self, one: &dyn Reflect, two: &dyn Reflect, depth: usize) -> MatchOutcome {
        if depth > self.config.max_depth {
            return self.fail(format!(
                "match depth limit of {} exceeded (cyclic or pathologically deep graph?)",
                self.config.max_depth
            ));
        }
        match (resolve(one), resolve(two)) {
            (Resolved::Null, Resolved::Null) => MatchOutcome::success(),
            (Resolved::Null, Resolved::Node(node, _)) => self.fail(format!("None != {node:?}")),
            (Resolved::Node(node, _), Resolved::Null) => self.fail(format!("{node:?} != None")),
            (Resolved::Node(one, shape_one), Resolved::Node(two, shape_two)) => {
                self.match_nodes(one, shape_one, two, shape_two, depth)
            }
        }
    }

    fn match_nodes(
        &mut self,
        one: &dyn Reflect,
        shape_one: Shape<'_>,
        two: &dyn Reflect,
        shape_two: Shape<'_>,
        depth: usize,
    ) -> MatchOutcome {
        if one.type_id() != two.type_id() {
            return self.fail(format!(
                "objects are not the same type ({} versus {})",
                one.type_name(),
                two.type_name()
            ));
        }

        // Caller-registered immutable types compare by content; sharing the
        // same instance is harmless for them, so identity is never checked.
        if let Some(registered) = self.config.value_types.lookup(one.type_id()) {
            return if (registered.eq)(one, two) {
                MatchOutcome::success()
            } else {
                self.value_not_equal(one, two)
            };
        }

        // Built-in scalars follow the same rule.
        if let (Shape::Scalar(a), Shape::Scalar(b)) = (&shape_one, &shape_two) {
            return if a == b {
                MatchOutcome::success()
            } else {
                self.value_not_equal(one, two)
            };
        }

        // For fieldless enums, equal variants are value equality.
        if let (Shape::Variant(a), Shape::Variant(b)) = (&shape_one, &shape_two) {
            return if a == b {
                MatchOutcome::success()
            } else {
                self.value_not_equal(one, two)
            };
        }

        // The central invariant: a copy must not share any mutable node with
        // its source. Zero-sized values are exempt since distinct instances
        // may legally occupy the same address, and so is pure value content:
        // borrows of equal array literals can be promoted to deduplicated
        // statics, so their addresses carry no sharing evidence. Identity
        // policing applies to heap- and stack-allocated structure.
        if !pure_value_content(&shape_one)
            && mem::size_of_val(one) > 0
            && ptr::addr_eq(one as *const dyn Reflect, two as *const dyn Reflect)
        {
            return self.fail("The same instance cannot be a deep copy of itself".to_string());
        }

        match (shape_one, shape_two) {
            (Shape::Array(a), Shape::Array(b)) => self.array_match(a, b, depth),
            (Shape::Map(a), Shape::Map(b)) => self.map_match(&a, &b, depth),
            (
                Shape::Collection {
                    ordered: true,
                    items: a,
                },
                Shape::Collection {
                    ordered: true,
                    items: b,
                },
            ) => self.positional_match(&a, &b, depth, PathSegment::At),
            (Shape::Collection { items: a, .. }, Shape::Collection { items: b, .. }) => {
                self.unordered_match(&a, &b, depth)
            }
            (Shape::Composite(a), Shape::Composite(b)) => self.composite_match(&a, &b, depth),
            (Shape::Opaque(reason), Shape::Opaque(_)) => self.fail(format!(
                "cannot inspect value of type {}: {reason}",
                one.type_name()
            )),
            // One runtime type always reflects to one shape kind; reaching
            // this arm means an impl the engine does not cover.
            _ => panic!("unsupported shape pairing for type {}", one.type_name()),
        }
    }

    /// Composite values compare field by field in declaration order,
    /// returning the first failing field without visiting the rest.
    fn composite_match(
        &mut self,
        one: &[Field<'_>],
        two: &[Field<'_>],
        depth: usize,
    ) -> MatchOutcome {
        for (field_one, field_two) in one.iter().zip(two.iter()) {
            self.path.push(PathSegment::Field(field_one.name));
            let result = self.match_pair(field_one.value, field_two.value, depth + 1);
            if !result.is_deep_copy {
                return result;
            }
            self.path.pop();
        }
        MatchOutcome::success()
    }

    fn array_match(&mut self, one: ArrayItems<'_>, two: ArrayItems<'_>, depth: usize) -> MatchOutcome {
        use ArrayItems::*;
        match (one, two) {
            (I64(a), I64(b)) => self.primitive_array_match(a, b, |x, y| x == y),
            (I32(a), I32(b)) => self.primitive_array_match(a, b, |x, y| x == y),
            (F64(a), F64(b)) => self.primitive_array_match(a, b, |x, y| x.to_bits() == y.to_bits()),
            (F32(a), F32(b)) => self.primitive_array_match(a, b, |x, y| x.to_bits() == y.to_bits()),
            (Bool(a), Bool(b)) => self.primitive_array_match(a, b, |x, y| x == y),
            (U8(a), U8(b)) => self.primitive_array_match(a, b, |x, y| x == y),
            (Object(a), Object(b)) => self.positional_match(&a, &b, depth, PathSegment::Index),
            // Identical runtime types cannot disagree on element kind; this
            // is an implementation gap and must abort loudly.
            (a, b) => panic!("unrecognized array element kind pairing: {a:?} versus {b:?}"),
        }
    }

    /// Index-by-index comparison of primitive elements. Two passes so a
    /// length mismatch is reported whichever side is shorter; an index beyond
    /// the other side's length compares against the `<absent>` sentinel,
    /// which no present element (not even a null) ever equals.
    fn primitive_array_match<T: fmt::Debug>(
        &mut self,
        one: &[T],
        two: &[T],
        eq: fn(&T, &T) -> bool,
    ) -> MatchOutcome {
        for (i, x) in one.iter().enumerate() {
            self.path.push(PathSegment::Index(i));
            match two.get(i) {
                Some(y) if eq(x, y) => self.path.pop(),
                Some(y) => return self.fail(format!("{x:?} != {y:?}")),
                None => return self.fail(format!("{x:?} != <absent>")),
            }
        }
        for (i, y) in two.iter().enumerate() {
            self.path.push(PathSegment::Index(i));
            match one.get(i) {
                Some(x) if eq(x, y) => self.path.pop(),
                Some(x) => return self.fail(format!("{x:?} != {y:?}")),
                None => return self.fail(format!("<absent> != {y:?}")),
            }
        }
        MatchOutcome::success()
    }

    /// Lock-step positional comparison shared by object arrays (`[i]`
    /// segments) and ordered collections (`at(i)` segments). Same two-pass
    /// structure as the primitive array matcher.
    fn positional_match(
        &mut self,
        one: &[&dyn Reflect],
        two: &[&dyn Reflect],
        depth: usize,
        segment: fn(usize) -> PathSegment,
    ) -> MatchOutcome {
        for (i, x) in one.iter().enumerate() {
            self.path.push(segment(i));
            match two.get(i) {
                Some(y) => {
                    let result = self.match_pair(*x, *y, depth + 1);
                    if !result.is_deep_copy {
                        return result;
                    }
                    self.path.pop();
                }
                None => return self.fail(format!("{x:?} != <absent>")),
            }
        }
        for (i, y) in two.iter().enumerate() {
            self.path.push(segment(i));
            match one.get(i) {
                Some(x) => {
                    let result = self.match_pair(*x, *y, depth + 1);
                    if !result.is_deep_copy {
                        return result;
                    }
                    self.path.pop();
                }
                None => return self.fail(format!("<absent> != {y:?}")),
            }
        }
        MatchOutcome::success()
    }

    /// Every key of A is looked up in B, then symmetrically every key of B in
    /// A; neither pass alone can catch keys unique to the other side. A key
    /// missing from one side is the null case, per the map lookup contract.
    fn map_match(
        &mut self,
        one: &[MapEntry<'_>],
        two: &[MapEntry<'_>],
        depth: usize,
    ) -> MatchOutcome {
        let index_one = index_entries(one);
        let index_two = index_entries(two);

        for entry in one {
            self.path.push(PathSegment::Key(entry.key.clone()));
            match index_two.get(entry.key.as_str()) {
                Some(other) => {
                    let result = self.match_pair(entry.value, *other, depth + 1);
                    if !result.is_deep_copy {
                        return result;
                    }
                    self.path.pop();
                }
                None => return self.fail(format!("{:?} != None", entry.value)),
            }
        }
        for entry in two {
            self.path.push(PathSegment::Key(entry.key.clone()));
            match index_one.get(entry.key.as_str()) {
                Some(other) => {
                    let result = self.match_pair(*other, entry.value, depth + 1);
                    if !result.is_deep_copy {
                        return result;
                    }
                    self.path.pop();
                }
                None => return self.fail(format!("None != {:?}", entry.value)),
            }
        }
        MatchOutcome::success()
    }

    /// Multiset comparison for unordered groupings: each element of A claims
    /// the first still-unclaimed element of B that deep-matches it (probed
    /// with a scratch matcher so failed probes leave no trace on the path).
    /// Unclaimed leftovers on either side surface as `<absent>`.
    fn unordered_match(
        &mut self,
        one: &[&dyn Reflect],
        two: &[&dyn Reflect],
        depth: usize,
    ) -> MatchOutcome {
        let mut claimed = vec![false; two.len()];
        for (i, x) in one.iter().enumerate() {
            self.path.push(PathSegment::At(i));
            let found = (0..two.len()).find(|&j| !claimed[j] && self.probe(*x, two[j], depth + 1));
            match found {
                Some(j) => {
                    claimed[j] = true;
                    self.path.pop();
                }
                None => return self.fail(format!("{x:?} != <absent>")),
            }
        }
        if let Some(j) = claimed.iter().position(|c| !c) {
            self.path.push(PathSegment::At(j));
            return self.fail(format!("<absent> != {:?}", two[j]));
        }
        MatchOutcome::success()
    }

    /// Side-effect-free trial match used by [`unordered_match`]; runs on a
    /// scratch matcher with its own path so the main tracker is untouched.
    fn probe(&self, one: &dyn Reflect, two: &dyn Reflect, depth: usize) -> bool {
        let mut scratch = Matcher {
            config: self.config.clone(),
            path: PathTracker::new(),
        };
        scratch.match_pair(one, two, depth).is_deep_copy
    }

    fn value_not_equal(&self, one: &dyn Reflect, two: &dyn Reflect) -> MatchOutcome {
        self.fail(format!("{one:?} != {two:?}"))
    }

    /// Builds the failure from the current path; the path is deliberately
    /// left in place so enclosing frames render the same trail while the run
    /// unwinds.
    fn fail(&self, message: String) -> MatchOutcome {
        let description = format!("{}: {message}", self.path.render());
        debug!(%description, "deep copy divergence");
        MatchOutcome::failure(description)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot comparison with the default configuration.
pub fn deep_copy_matches(source: &dyn Reflect, copy: &dyn Reflect) -> MatchOutcome {
    Matcher::new().matches(source, copy)
}

/// Keyed lookup over the opposite side's entries, matching the map's own
/// `get` semantics on the rendered key.
fn index_entries<'a>(entries: &'a [MapEntry<'a>]) -> HashMap<&'a str, &'a dyn Reflect> {
    entries
        .iter()
        .map(|entry| (entry.key.as_str(), entry.value))
        .collect()
}

/// Primitive arrays hold no mutable substructure, so instance sharing is as
/// harmless for them as for scalars. Object arrays keep the identity rule:
/// their elements are structure.
fn pure_value_content(shape: &Shape<'_>) -> bool {
    matches!(shape, Shape::Array(items) if !matches!(items, ArrayItems::Object(_)))
}

enum Resolved<'a> {
    Null,
    Node(&'a dyn Reflect, Shape<'a>),
}

/// Unwraps transparent wrapper chains (`Some`, `Box`, `Rc`, `Arc`) so type,
/// value, and identity checks all apply to the referent.
fn resolve(mut node: &dyn Reflect) -> Resolved<'_> {
    loop {
        match node.shape() {
            Shape::Delegate(inner) => node = inner,
            Shape::Null => return Resolved::Null,
            shape => return Resolved::Node(node, shape),
        }
    }
}
