//! Error types for data validation in ecosense-types.

use thiserror::Error;

/// Errors that can occur when constructing or validating telemetry data.
///
/// This error type is transport-agnostic; HTTP and decoding errors belong
/// in ecosense-core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A field value is outside its acceptable range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using ecosense-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
