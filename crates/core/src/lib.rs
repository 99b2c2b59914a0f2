//! Shared primitives for all Rust crates in Depot.

#![forbid(unsafe_code)]

mod result_code;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use result_code::ResultCode;

/// Result type used across Depot crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Surrogate identifier assigned by storage when an entity is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wraps a storage-assigned identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Error taxonomy shared by validation, arbitration and storage code paths.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input that does not fit a more specific variant.
    #[error("validation error: {0}")]
    Validation(String),

    /// The payload did not carry a single attribute.
    #[error("payload must contain at least one field")]
    EmptyPayload,

    /// The payload names a field the entity schema does not declare.
    #[error("unknown field '{field}' for entity '{entity}'")]
    UnknownField {
        /// Entity logical name.
        entity: String,
        /// Offending payload key.
        field: String,
    },

    /// The payload value cannot be coerced to the declared field kind.
    #[error("field '{field}' expects a {expected} value")]
    InvalidType {
        /// Field name.
        field: String,
        /// Declared field kind.
        expected: &'static str,
    },

    /// A text value is longer than the declared maximum length.
    #[error("field '{field}' exceeds the maximum length of {limit} characters")]
    FieldTooLong {
        /// Field name.
        field: String,
        /// Declared maximum length in characters.
        limit: usize,
    },

    /// A required or business-key text field is empty or whitespace.
    #[error("field '{field}' must not be empty or whitespace")]
    EmptyRequiredField {
        /// Field name.
        field: String,
    },

    /// A create payload omits a required field.
    #[error("missing required field '{field}'")]
    MissingRequiredField {
        /// Field name.
        field: String,
    },

    /// Write operation collides with an existing business key or reference.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A dependency declared by the entity schema points at a missing entity.
    #[error("field '{field}' references missing {entity} '{id}'")]
    MissingReference {
        /// Dependency field name.
        field: String,
        /// Referenced entity logical name.
        entity: String,
        /// Referenced identifier.
        id: EntityId,
    },

    /// A storage read failed for a reason other than absence.
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    /// A write did not apply.
    #[error("storage write failed: {0}")]
    StorageWriteFailed(String),

    /// The write applied but the authoritative re-read failed or returned nothing.
    #[error("post-write read failed: {0}")]
    PostWriteReadFailed(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps the error onto the abstract result code consumed by the boundary.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Validation(_)
            | Self::EmptyPayload
            | Self::UnknownField { .. }
            | Self::InvalidType { .. }
            | Self::FieldTooLong { .. }
            | Self::EmptyRequiredField { .. }
            | Self::MissingRequiredField { .. } => ResultCode::BadInput,
            Self::Conflict(_) => ResultCode::Conflict,
            Self::NotFound(_) | Self::MissingReference { .. } => ResultCode::NotFound,
            Self::LookupFailed(_)
            | Self::StorageWriteFailed(_)
            | Self::PostWriteReadFailed(_)
            | Self::Internal(_) => ResultCode::InternalError,
        }
    }

    /// Returns whether the caller can fix the request and retry.
    #[must_use]
    pub fn is_client_correctable(&self) -> bool {
        !matches!(self.result_code(), ResultCode::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, EntityId, NonEmptyString, ResultCode};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn entity_id_formats_as_integer() {
        assert_eq!(EntityId::new(42).to_string(), "42");
    }

    #[test]
    fn validation_failures_map_to_bad_input() {
        let errors = [
            AppError::EmptyPayload,
            AppError::UnknownField {
                entity: "warehouse".to_owned(),
                field: "colour".to_owned(),
            },
            AppError::InvalidType {
                field: "minimum_capacity".to_owned(),
                expected: "integer",
            },
            AppError::FieldTooLong {
                field: "telephone".to_owned(),
                limit: 20,
            },
            AppError::EmptyRequiredField {
                field: "warehouse_code".to_owned(),
            },
            AppError::MissingRequiredField {
                field: "address".to_owned(),
            },
        ];

        for error in errors {
            assert_eq!(error.result_code(), ResultCode::BadInput);
            assert!(error.is_client_correctable());
        }
    }

    #[test]
    fn missing_reference_maps_to_not_found() {
        let error = AppError::MissingReference {
            field: "employee_id".to_owned(),
            entity: "employee".to_owned(),
            id: EntityId::new(7),
        };

        assert_eq!(error.result_code(), ResultCode::NotFound);
        assert_eq!(
            error.to_string(),
            "field 'employee_id' references missing employee '7'"
        );
    }

    #[test]
    fn storage_failures_map_to_internal_error() {
        for error in [
            AppError::LookupFailed("connection reset".to_owned()),
            AppError::StorageWriteFailed("no rows affected".to_owned()),
            AppError::PostWriteReadFailed("row vanished".to_owned()),
        ] {
            assert_eq!(error.result_code(), ResultCode::InternalError);
            assert!(!error.is_client_correctable());
        }
    }
}
