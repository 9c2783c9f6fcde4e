use thiserror::Error;

/// Errors raised when constructing a matcher.
///
/// Divergences found during a comparison are never errors; they are reported
/// through [`MatchOutcome`](crate::MatchOutcome) failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}
