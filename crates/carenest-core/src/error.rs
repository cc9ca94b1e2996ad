//! Error types for the CareNest booking core.

use thiserror::Error;

/// A required-field or rule violation detected at the confirm boundary.
///
/// Validation errors are local and synchronous. They never reach the
/// persistence layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field the vertical requires was not set before confirming.
    #[error("{field} is required to confirm a {vertical} booking")]
    MissingField {
        vertical: &'static str,
        field: &'static str,
    },

    /// The vertical needs at least one line item (service, test, medicine).
    #[error("a {vertical} booking needs at least one item")]
    NoLineItems { vertical: &'static str },

    /// The selected mode is outside the set the vertical declares.
    #[error("mode '{mode}' is not offered for {vertical} bookings")]
    ModeNotAllowed {
        vertical: &'static str,
        mode: String,
    },

    /// The slot label is not part of the fixed slot enumeration.
    #[error("unknown time slot '{0}'")]
    UnknownSlot(String),

    /// The slot exists but has been booked out.
    #[error("time slot '{0}' is no longer available")]
    SlotUnavailable(String),

    /// Duration-based pricing needs a positive number of hours or days.
    #[error("duration must be at least one {unit}")]
    InvalidDuration { unit: &'static str },

    /// The flow was already confirmed and its draft is frozen.
    #[error("booking has already been confirmed")]
    AlreadyConfirmed,
}

/// A shared error type for the CareNest crates.
///
/// Typed variants with constructor helpers and automatic conversion from
/// the I/O and serialization errors the adapters run into.
#[derive(Error, Debug, Clone)]
pub enum CareNestError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Draft validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An operation needed a signed-in user and there was none
    #[error("No authenticated user")]
    Unauthenticated,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CareNestError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// True for failures of the durable store (I/O, data access, encoding).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::DataAccess(_) | Self::Serialization { .. }
        )
    }
}

impl From<std::io::Error> for CareNestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CareNestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CareNestError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, CareNestError>`.
pub type Result<T> = std::result::Result<T, CareNestError>;
