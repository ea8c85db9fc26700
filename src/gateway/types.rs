//! API envelope and error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API wrapper for standard response format
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            data: Some(data),
            msg: None,
        }
    }

    pub fn outcome(code: i32, data: T, msg: impl ToString) -> Self {
        Self {
            code,
            data: Some(data),
            msg: Some(msg.to_string()),
        }
    }
}

/// Error codes surfaced in the envelope
pub mod error_codes {
    pub const INVALID_REQUEST: i32 = -1001;
    pub const VALIDATION_REJECTED: i32 = -2001;
    pub const RAIL_REJECTED: i32 = -3001;
    pub const INDETERMINATE: i32 = -3002;
    pub const RECORDING_FAILED: i32 = -4001;
    pub const STORE_UNAVAILABLE: i32 = -5001;
    pub const INTERNAL: i32 = -5002;
}

/// Handler error carrying the HTTP status and envelope code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn bad_request(msg: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_codes::INVALID_REQUEST,
            msg: msg.to_string(),
        }
    }

    pub fn service_unavailable(msg: impl ToString) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: error_codes::STORE_UNAVAILABLE,
            msg: msg.to_string(),
        }
    }

    pub fn internal(msg: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: error_codes::INTERNAL,
            msg: msg.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            code: self.code,
            data: None,
            msg: Some(self.msg),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Handler result alias
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
