//! Error types for the policy equality engine.

use thiserror::Error;

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors that can occur while canonicalizing or comparing policies.
///
/// Any failure aborts the equality test it occurred in; an error must never
/// be read as "not equal".
#[derive(Debug, Error)]
pub enum PolicyError {
    /// An expression variant without a stable string rendering reached the
    /// comparator.
    #[error("Unsupported expression kind: {0}")]
    UnsupportedExpression(String),

    /// A multiplicity constraint carried no children.
    #[error("Malformed constraint: {0}")]
    MalformedConstraint(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Canonicalization error.
    #[error("Canonicalization error: {0}")]
    CanonicalizationError(String),
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::SerializationError(err.to_string())
    }
}
