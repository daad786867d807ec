use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::FieldError;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// One entry of a 422 `detail` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ErrorDetail {
    fn new(loc: &[&str], msg: impl Into<String>, kind: &'static str) -> Self {
        Self { loc: loc.iter().map(|s| s.to_string()).collect(), msg: msg.into(), kind }
    }
}

/// HTTP-facing error. Every variant renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unprocessable input")]
    Unprocessable(Vec<ErrorDetail>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Field failures found in the part of the request named by `location` (`body`, `query`).
    pub fn invalid_fields(location: &str, fields: Vec<FieldError>) -> Self {
        let details = fields
            .into_iter()
            .map(|f| ErrorDetail::new(&[location, f.field.as_str()], f.message, "value_error"))
            .collect();
        Self::Unprocessable(details)
    }

    /// Map a service failure, attributing validation errors to `location`.
    pub fn from_service(location: &str, e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => Self::invalid_fields(location, fields),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Db(msg) => Self::Internal(msg),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self::from_service("body", e) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Unprocessable(vec![ErrorDetail::new(&["body"], rejection.body_text(), "json_invalid")])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Unprocessable(vec![ErrorDetail::new(&["query"], rejection.body_text(), "query_invalid")])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Unprocessable(vec![ErrorDetail::new(&["path", "id"], rejection.body_text(), "path_invalid")])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Unprocessable(details) => serde_json::json!(details),
            Self::Internal(msg) => {
                error!(error = %msg, "request failed");
                serde_json::json!("internal server error")
            }
            Self::NotFound(msg) | Self::Conflict(msg) | Self::Unauthorized(msg) => serde_json::json!(msg),
        };
        let mut resp = (status, Json(serde_json::json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}
