use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input is empty, too short for the required window, or lacks a required field.
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Malformed field {field}: {value}")]
    MalformedField { field: String, value: String },

    /// A ratio whose denominator is zero and has no defined fallback.
    #[error("Degenerate division: {0}")]
    DegenerateDivision(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a `MissingData` error.
    pub fn missing(what: impl Into<String>) -> Self {
        AppError::MissingData(what.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingData(_)
            | AppError::MalformedField { .. }
            | AppError::DegenerateDivision(_)
            | AppError::InvalidSeries(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::SerdeJson(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
