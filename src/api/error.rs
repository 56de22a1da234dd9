use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::CsvqlError;

use super::types::ErrorResponse;

/// Maps core errors onto HTTP statuses with a stable error code.
#[derive(Debug)]
pub struct ApiError(pub CsvqlError);

impl From<CsvqlError> for ApiError {
    fn from(err: CsvqlError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            CsvqlError::ParseError(_) => (StatusCode::BAD_REQUEST, "PARSE_ERROR"),
            CsvqlError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            CsvqlError::QueryError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "QUERY_ERROR"),
            CsvqlError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            CsvqlError::NoTableLoaded(_) => (StatusCode::NOT_FOUND, "NO_TABLE_LOADED"),
            CsvqlError::IoError(_)
            | CsvqlError::ArrowError(_)
            | CsvqlError::ConfigParsingError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
