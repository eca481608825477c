use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error payload sent to clients
///
/// Serializes as:
///
/// ```json
/// { "status": 404, "message": "item 7 not found", "stackTrace": null }
/// ```
///
/// `stackTrace` is always present in the JSON and is `null` unless the advice runs with
/// diagnostics exposed.
///
/// # Example
/// ```
/// use exception_advice::common::ErrorResource;
/// use axum::http::StatusCode;
///
/// let resource = ErrorResource::new(StatusCode::NOT_FOUND, "item 7 not found", None);
/// assert_eq!(resource.status(), 404);
/// assert!(resource.stack_trace().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResource {
    status: u16,
    message: String,
    stack_trace: Option<String>,
}

impl ErrorResource {
    pub fn new(status: StatusCode, message: impl Into<String>, stack_trace: Option<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            stack_trace,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }
}

impl IntoResponse for ErrorResource {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
