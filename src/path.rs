//! Breadcrumb trail describing where in a value graph a divergence was found.
//!
//! The tracker behaves as a stack that always holds at least the `root`
//! sentinel. A segment is pushed before descending into a sub-value and popped
//! only when that sub-match succeeds; a failing sub-match leaves the stack in
//! place so the failure message can be rendered from it while the run unwinds.

use std::fmt;

/// One step of a diagnostic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Sentinel for the top-level pair under comparison.
    Root,
    /// A named member of a composite value.
    Field(&'static str),
    /// An array index, rendered `[i]`.
    Index(usize),
    /// A collection position, rendered `at(i)`.
    At(usize),
    /// A map key, rendered `get(key)`.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Root => f.write_str("root"),
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::At(i) => write!(f, "at({i})"),
            PathSegment::Key(key) => write!(f, "get({key})"),
        }
    }
}

/// Ordered stack of [`PathSegment`]s owned by a single matching run.
#[derive(Debug, Clone)]
pub struct PathTracker {
    segments: Vec<PathSegment>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self {
            segments: vec![PathSegment::Root],
        }
    }

    /// Drops everything but the root sentinel, ready for a fresh run.
    pub fn reset(&mut self) {
        self.segments.truncate(1);
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Pops the most recent segment; the root sentinel is never removed.
    pub fn pop(&mut self) {
        if self.segments.len() > 1 {
            self.segments.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Joins the segments with `->`, e.g. `root->orders->at(2)->id`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push_str("->");
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl Default for PathTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PathTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
