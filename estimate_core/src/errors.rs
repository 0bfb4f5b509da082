//! # Error Types
//!
//! Structured error types for estimate_core. Engine and wizard failures share
//! [`EstimateError`]; failures of external collaborators (address search,
//! building context, imagery, delivery) use [`ServiceError`] and are always
//! recovered before they reach the engine.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_surface(surface_m2: f64) -> EstimateResult<()> {
//!     if surface_m2 < 0.0 {
//!         return Err(EstimateError::InvalidInput {
//!             field: "treated_surface_m2".to_string(),
//!             value: surface_m2.to_string(),
//!             reason: "Surface cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wizard::Stage;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimation and wizard operations.
///
/// Each variant provides specific context about what went wrong,
/// so callers can react programmatically instead of parsing messages.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, outside a closed enumeration, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A wizard stage cannot be left because its data is incomplete
    #[error("Stage {stage} is incomplete: missing {field}")]
    StageIncomplete { stage: Stage, field: String },

    /// Data was submitted for a stage other than the current one
    #[error("Cannot submit {submitted} data while on stage {current}")]
    StageMismatch { current: Stage, submitted: Stage },

    /// A transition that the wizard never allows from the current stage
    #[error("Invalid transition from {from}: {reason}")]
    InvalidTransition { from: Stage, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema or rate table version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Document rendering failed
    #[error("Render failed: {reason}")]
    RenderFailed { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create a StageIncomplete error
    pub fn stage_incomplete(stage: Stage, field: impl Into<String>) -> Self {
        EstimateError::StageIncomplete {
            stage,
            field: field.into(),
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: Stage, reason: impl Into<String>) -> Self {
        EstimateError::InvalidTransition {
            from,
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        EstimateError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Whether the caller broke the engine's input contract.
    ///
    /// Contract violations must be surfaced, never coerced.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, EstimateError::InvalidInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::StageIncomplete { .. } => "STAGE_INCOMPLETE",
            EstimateError::StageMismatch { .. } => "STAGE_MISMATCH",
            EstimateError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EstimateError::RenderFailed { .. } => "RENDER_FAILED",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Failure of an external collaborator.
///
/// These are recovered locally by the wrappers in [`crate::services`]; they
/// are never stored in the session and never reach the pricing engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The remote service did not answer in time
    #[error("{service} timed out")]
    Timeout { service: String },

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("{service} unreachable: {reason}")]
    Unavailable { service: String, reason: String },

    /// The service answered with something we could not use
    #[error("{service} returned an unusable response: {reason}")]
    BadResponse { service: String, reason: String },

    /// The collaborator is not configured (missing key, missing directory, ...)
    #[error("{service} is not configured: {reason}")]
    NotConfigured { service: String, reason: String },
}

impl ServiceError {
    /// Name of the collaborator that failed
    pub fn service(&self) -> &str {
        match self {
            ServiceError::Timeout { service }
            | ServiceError::Unavailable { service, .. }
            | ServiceError::BadResponse { service, .. }
            | ServiceError::NotConfigured { service, .. } => service,
        }
    }
}
