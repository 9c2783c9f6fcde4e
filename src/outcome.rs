use serde::{Deserialize, Serialize};

/// Outcome of a single deep-copy comparison.
///
/// `MatchOutcome` is immutable once constructed: `failure_description` is
/// `Some` exactly when `is_deep_copy` is `false`. Use [`MatchOutcome::success`]
/// and [`MatchOutcome::failure`] rather than building the struct by hand so
/// that invariant holds.
///
/// The failure description has the form `<path>: <reason>`, e.g.
/// `root->first_field: 4563 != 4564`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// True when the second operand is a valid deep copy of the first.
    pub is_deep_copy: bool,
    /// Human-readable path plus mismatch reason; present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_description: Option<String>,
}

impl MatchOutcome {
    /// A successful comparison.
    pub fn success() -> Self {
        Self {
            is_deep_copy: true,
            failure_description: None,
        }
    }

    /// A failed comparison carrying the full path-prefixed description.
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            is_deep_copy: false,
            failure_description: Some(description.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.is_deep_copy
    }
}
