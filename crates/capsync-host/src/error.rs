//! Error types for the host adapter.

use capsync_convert::{ConvertError, System};
use thiserror::Error;

/// Failure to read or write a capsule's center through a [`CenterAccessor`](crate::CenterAccessor).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// None of the tried fields exist on the component.
    #[error("no center field found (tried {tried:?})")]
    NotFound {
        /// Field names that were tried.
        tried: Vec<String>,
    },

    /// The field exists but does not hold a vector.
    #[error("field {field} is not a vector: {reason}")]
    Malformed {
        /// Field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The accessor has nowhere to write.
    #[error("center is read-only: {0}")]
    ReadOnly(String),
}

/// Errors raised while converting colliders on scene objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// Both systems are attached to the same object.
    #[error("object {object} carries both System A and System B colliders")]
    Ambiguous {
        /// Object name.
        object: String,
    },

    /// The object has no collider of the source system.
    #[error("object {object} has no System {system} collider")]
    MissingCollider {
        /// Object name.
        object: String,
        /// The system that was looked for.
        system: System,
    },

    /// A public field is missing or has the wrong type.
    #[error("object {object}: field {field} {reason}")]
    Field {
        /// Object name.
        object: String,
        /// Field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Writing the center failed.
    #[error("object {object}: {source}")]
    Access {
        /// Object name.
        object: String,
        /// Underlying accessor failure.
        #[source]
        source: AccessError,
    },

    /// The converter rejected the input.
    #[error("object {object}: {source}")]
    Convert {
        /// Object name.
        object: String,
        /// Underlying conversion failure.
        #[source]
        source: ConvertError,
    },
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;
