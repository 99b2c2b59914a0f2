use depot_core::{AppResult, ResultCode};
use serde::Serialize;
use tracing::{debug, warn};

/// Kind of request whose outcome is being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Entity creation.
    Create,
    /// Single or list read.
    Read,
    /// Partial update.
    Update,
    /// Hard delete.
    Delete,
}

impl Operation {
    /// Returns the result code reported when the operation succeeds.
    #[must_use]
    pub fn success_code(&self) -> ResultCode {
        match self {
            Self::Create => ResultCode::Created,
            Self::Read => ResultCode::Ok,
            Self::Update => ResultCode::Updated,
            Self::Delete => ResultCode::NoContent,
        }
    }
}

/// Result code plus payload or cause, handed to the boundary layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply<T> {
    code: ResultCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> Reply<T> {
    /// Maps an operation outcome onto exactly one result code.
    pub fn from_outcome(operation: Operation, outcome: AppResult<T>) -> Self {
        match outcome {
            Ok(value) => Self {
                code: operation.success_code(),
                payload: (operation != Operation::Delete).then_some(value),
                message: None,
            },
            Err(error) => {
                let code = error.result_code();
                if code == ResultCode::InternalError {
                    warn!(error = %error, operation = ?operation, "request failed in storage");
                } else {
                    debug!(
                        error = %error,
                        operation = ?operation,
                        code = code.as_str(),
                        "request rejected"
                    );
                }

                Self {
                    code,
                    payload: None,
                    message: Some(error.to_string()),
                }
            }
        }
    }

    /// Returns the result code.
    #[must_use]
    pub fn code(&self) -> ResultCode {
        self.code
    }

    /// Returns the success payload.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Returns the human-readable failure cause.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consumes the reply and returns the success payload.
    #[must_use]
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}
