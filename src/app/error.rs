use crate::utils::error::ContactError;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        FromRequest,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Default HTTP status for a failure. Auth handlers pick their own status for upstream errors.
pub fn status_for(error: &ContactError) -> StatusCode {
    match error {
        ContactError::Validation { .. }
        | ContactError::Upload { .. }
        | ContactError::Csv(_) => StatusCode::BAD_REQUEST,
        ContactError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        ContactError::NotFound { .. } => StatusCode::NOT_FOUND,
        ContactError::AmbiguousKey { .. } => StatusCode::CONFLICT,
        ContactError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        ContactError::PayloadTooLarge { .. } | ContactError::RowLimitExceeded { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        ContactError::Upstream { .. } | ContactError::Http(_) => StatusCode::BAD_GATEWAY,
        ContactError::Store { .. }
        | ContactError::Io(_)
        | ContactError::Serialization(_)
        | ContactError::Config { .. }
        | ContactError::InvalidConfigValue { .. }
        | ContactError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error response: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Keeps the error's message but answers with `status`.
    pub fn with_status(status: StatusCode, error: ContactError) -> Self {
        Self::new(status, error.to_string())
    }
}

impl From<ContactError> for ApiError {
    fn from(error: ContactError) -> Self {
        Self::new(status_for(&error), error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the `{"error": ...}` body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}", self.status, self.message);
        } else {
            tracing::debug!("{} {}", self.status, self.message);
        }

        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
