//! # deepmatch
//!
//! ## Purpose
//!
//! `deepmatch` is a deep-copy assertion engine for test suites: given two
//! values of arbitrary nested (acyclic) structure, it decides whether the
//! second is a *true deep copy* of the first — every contained atomic value
//! equal by content, and no mutable node the identical instance on both
//! sides — and on failure reports the exact path to the first divergence,
//! e.g. `root->orders->at(2)->id: 17 != 18`. Its job is to catch copy
//! implementations that leak shared references.
//!
//! ## Core Types
//!
//! - [`Reflect`]: the capability a type implements to take part in a
//!   comparison; std scalars, strings, smart pointers, arrays, and the std
//!   containers are covered out of the box.
//! - [`reflect_struct!`] / [`reflect_enum!`]: one-line `Reflect` impls for
//!   user composites and fieldless enums.
//! - [`Matcher`]: the recursive engine; one instance per assertion run.
//! - [`MatcherConfig`] / [`ValueTypeSet`]: recursion depth bound and the
//!   closed set of caller-declared atomic value types (e.g. an immutable
//!   timestamp type whose sharing is harmless).
//! - [`MatchOutcome`]: success, or a failure carrying `<path>: <reason>`.
//!
//! ## Example Usage
//!
//! ```
//! use deepmatch::{reflect_struct, Matcher};
//!
//! #[derive(Debug)]
//! struct Account {
//!     id: i64,
//!     tags: Vec<String>,
//! }
//! reflect_struct!(Account { id, tags });
//!
//! let source = Account { id: 7, tags: vec!["vip".into()] };
//! let copy = Account { id: 7, tags: vec!["vip".into()] };
//!
//! let mut matcher = Matcher::new();
//! let outcome = matcher.matches(&source, &copy);
//! assert!(outcome.is_deep_copy);
//!
//! // Comparing a value against itself is the defect this crate exists for:
//! let outcome = matcher.matches(&source, &source);
//! assert_eq!(
//!     outcome.failure_description.as_deref(),
//!     Some("root: The same instance cannot be a deep copy of itself"),
//! );
//! ```
//!
//! ## Semantics
//!
//! Value types (scalars, text, fieldless enum variants, registered immutable
//! types) compare by content only — two slots holding the very same `Rc`'d
//! string are still a valid copy, because immutability makes sharing
//! harmless. Everything else is an object: address identity between the two
//! sides, anywhere in the graph, fails the match. The walk is single-threaded
//! depth-first and fail-fast; cyclic graphs are not supported and are cut off
//! by the configurable depth bound.

pub mod config;
pub mod engine;
pub mod error;
mod macros;
pub mod outcome;
pub mod path;
pub mod reflect;

pub use crate::config::{MatcherConfig, ValueTypeSet, DEFAULT_MAX_DEPTH};
pub use crate::engine::{deep_copy_matches, Matcher};
pub use crate::error::MatchError;
pub use crate::outcome::MatchOutcome;
pub use crate::path::{PathSegment, PathTracker};
pub use crate::reflect::{ArrayItems, Field, MapEntry, Reflect, ScalarValue, Shape};
