//! Error types for apibump-core.

use thiserror::Error;

/// Result type alias for apibump-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a comparison or reject its inputs.
///
/// API differences are never errors; they surface as
/// [`Change`](crate::differ::Change) records instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Two entities at the same path expose different capabilities.
    #[error("Cannot compare {old_kind} with {new_kind} at `{path}`")]
    ShapeMismatch {
        /// Dotted path of the offending entity.
        path: String,
        /// Kind of the entity in the old snapshot.
        old_kind: &'static str,
        /// Kind of the entity in the new snapshot.
        new_kind: &'static str,
    },

    /// The ignore policy could not answer for a path.
    #[error("Ignore policy failed for `{path}`: {message}")]
    IgnorePolicy {
        /// Path that was being queried.
        path: String,
        /// Description of the policy failure.
        message: String,
    },

    /// An ignore rule is not a valid pattern.
    #[error("Invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern as written in the configuration.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A version string could not be parsed.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}
