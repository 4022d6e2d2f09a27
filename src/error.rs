//! # Error Types
//!
//! Every failure in the orbit model surfaces while a system is being built.
//! Once a tree exists, time updates and transforms cannot fail.

use thiserror::Error;

/// Errors raised while building or rearranging an orbit tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// A leaf body in the topology has no record in the parameter table
    #[error("missing parameters for '{0}'")]
    MissingParameters(String),

    /// A parameter record exists but one of its fields is unusable
    #[error("invalid parameter '{field}' for '{name}': {reason}")]
    Validation {
        name: String,
        field: &'static str,
        reason: String,
    },

    /// Two nodes in one tree share a name
    #[error("duplicate node name '{0}'")]
    DuplicateName(String),

    /// A `set_children` call that would break the tree shape
    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Matrix has no inverse
    #[error("matrix is singular")]
    SingularMatrix,
}
