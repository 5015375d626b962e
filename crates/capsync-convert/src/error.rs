//! Error types for capsule conversion.

use thiserror::Error;

/// Errors reported by a validating [`Converter`](crate::Converter).
///
/// The bare conversion functions are total and never produce these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A component is NaN or infinite.
    #[error("{field} is not finite")]
    NonFinite {
        /// Offending field name.
        field: &'static str,
    },

    /// A radius or length is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Offending field name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
