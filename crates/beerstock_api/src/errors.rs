//! Mapping of core and boundary failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use beerstock_core::{StockError, ValidationError};
use log::{error, info};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of one HTTP request.
#[derive(Debug)]
pub enum ApiError {
    /// Payload parsed but violated field constraints.
    Validation(ValidationError),
    /// Payload or path could not be parsed at all.
    BadRequest(String),
    /// Failure raised by the stock service.
    Stock(StockError),
    /// Failure of the server plumbing around the service.
    Internal(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Stock(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Stock(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StockError> for ApiError {
    fn from(value: StockError) -> Self {
        Self::Stock(value)
    }
}

impl ApiError {
    /// Status code and stable error code for this failure.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Stock(err) => match err {
                StockError::DuplicateName(_) => (StatusCode::BAD_REQUEST, "duplicate_name"),
                StockError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                StockError::CapacityExceeded { .. } => {
                    (StatusCode::BAD_REQUEST, "capacity_exceeded")
                }
                StockError::InsufficientStock { .. } => {
                    (StatusCode::BAD_REQUEST, "insufficient_stock")
                }
                StockError::ConcurrentUpdate(_) => (StatusCode::CONFLICT, "concurrent_update"),
                StockError::Repo(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            },
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(
                "event=http_error module=api status=error error_code={} error={}",
                code, self
            );
        } else {
            info!("event=http_error module=api status=rejected error_code={code}");
        }

        let mut body = json!({
            "error": code,
            "message": self.to_string(),
        });
        if let Self::Validation(err) = &self {
            body["violations"] = json!(err.violations);
        }

        (status, Json(body)).into_response()
    }
}
