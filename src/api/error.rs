use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

use super::models::ErrorResponse;
use crate::job::SubmitError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid job config: {0}")]
    InvalidConfig(String),

    #[error("a download job is already active")]
    JobAlreadyActive,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ApiError::JobAlreadyActive => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidConfig(_) => "INVALID_CONFIG",
            ApiError::JobAlreadyActive => "JOB_ALREADY_ACTIVE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(json!(body))).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::JobAlreadyActive => ApiError::JobAlreadyActive,
            SubmitError::InvalidConfig(e) => ApiError::InvalidConfig(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::plan::JobConfigError;

    #[test]
    fn submit_errors_map_to_http_semantics() {
        let conflict = ApiError::from(SubmitError::JobAlreadyActive);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.code(), "JOB_ALREADY_ACTIVE");

        let invalid = ApiError::from(SubmitError::InvalidConfig(
            JobConfigError::PlaceholderCount(0),
        ));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "INVALID_CONFIG");
        assert!(invalid.to_string().contains("placeholder"));
    }
}
