use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Transport-independent outcome of a core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    /// A read returned the requested data.
    Ok,
    /// A new entity was persisted.
    Created,
    /// An existing entity was partially updated.
    Updated,
    /// An entity was deleted.
    NoContent,
    /// The request failed schema or payload validation.
    BadInput,
    /// The request collides with a business key or an existing reference.
    Conflict,
    /// The target entity or a referenced entity does not exist.
    NotFound,
    /// Storage failed unexpectedly.
    InternalError,
}

impl ResultCode {
    /// Returns a stable identifier for the result code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::NoContent => "no_content",
            Self::BadInput => "bad_input",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }

    /// Returns whether the code reports a successful operation.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Ok | Self::Created | Self::Updated | Self::NoContent
        )
    }

    /// Suggested HTTP status for boundary layers that speak HTTP.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Ok | Self::Updated => StatusCode::OK,
            Self::Created => StatusCode::CREATED,
            Self::NoContent => StatusCode::NO_CONTENT,
            Self::BadInput => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::ResultCode;

    #[test]
    fn failure_codes_map_to_client_and_server_statuses() {
        assert_eq!(ResultCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ResultCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ResultCode::BadInput.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ResultCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn only_success_codes_report_success() {
        assert!(ResultCode::NoContent.is_success());
        assert!(!ResultCode::Conflict.is_success());
    }

    #[test]
    fn serializes_as_snake_case() {
        let encoded = serde_json::to_string(&ResultCode::InternalError).unwrap_or_default();
        assert_eq!(encoded, "\"internal_error\"");
        assert_eq!(ResultCode::NoContent.as_str(), "no_content");
    }
}
