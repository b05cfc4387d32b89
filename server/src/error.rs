//! Maps `EngineError` onto the wire error shape spec §6 defines: 400 for
//! malformed input, 503 when cancelled (the caller should retry), 500 for
//! internal invariant violations.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tray_router_engine::EngineError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = match &self.0 {
            EngineError::InputInvalid(_) => (StatusCode::BAD_REQUEST, "input_invalid"),
            EngineError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
            EngineError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody { error: label.to_string(), details: self.0.to_string() };
        (status, Json(body)).into_response()
    }
}
