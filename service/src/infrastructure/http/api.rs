use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::topic::error::WorkflowError;

// ApiSuccess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new_success(Some(data))))
    }
}

impl ApiSuccess<()> {
    /// Success envelope without a `data` member
    pub(crate) fn empty(status: StatusCode) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new_success(None)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::NotFound(_) => Self::NotFound(value.to_string()),
            WorkflowError::Unauthorized(message) => Self::Forbidden(message),
            WorkflowError::InvalidStateTransition { .. }
            | WorkflowError::InvalidStateForOperation { .. } => Self::BadRequest(value.to_string()),
            WorkflowError::ValidationError(message) => Self::BadRequest(message),
            WorkflowError::StorageError(cause) => Self::InternalServerError(cause),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, message) = match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Unauthenticated(message) => (StatusCode::UNAUTHORIZED, message),
            Forbidden(message) => (StatusCode::FORBIDDEN, message),
            NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(ApiResponseBody::<()>::new_error(message))).into_response()
    }
}

/// Envelope shared by all API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponseBody<T> {
    pub fn new_success(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn new_error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        guard::Operation,
        topic::{TopicId, TopicStatus, lifecycle::Trigger},
    };

    use super::*;

    #[test]
    fn workflow_errors_map_to_status_codes() {
        let cases = [
            (WorkflowError::NotFound(TopicId::generate()), StatusCode::NOT_FOUND),
            (WorkflowError::Unauthorized("no".into()), StatusCode::FORBIDDEN),
            (
                WorkflowError::InvalidStateTransition {
                    from: TopicStatus::Approved,
                    trigger: Trigger::Reject,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::InvalidStateForOperation {
                    operation: Operation::Delete,
                    status: TopicStatus::Pending,
                },
                StatusCode::BAD_REQUEST,
            ),
            (WorkflowError::ValidationError("bad".into()), StatusCode::BAD_REQUEST),
            (WorkflowError::StorageError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            let response = ApiError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn error_envelope_has_no_data() {
        let body = serde_json::to_value(ApiResponseBody::<()>::new_error("nope".into())).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "nope"}));
    }
}
