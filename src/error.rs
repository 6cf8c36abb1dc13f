use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("dependency failed: {0}")]
    Dependency(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Dependency(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound => AppError::NotFound("order not found".to_string()),
            StoreError::DasherNotFound => AppError::NotFound("dasher not found".to_string()),
            StoreError::TokenInvalid => AppError::NotFound("invalid or expired token".to_string()),
            StoreError::StaleStatus { .. } => {
                AppError::Conflict("order already accepted by another dasher".to_string())
            }
            StoreError::NotAssignee => {
                AppError::NotFound("order not found for this dasher".to_string())
            }
            StoreError::IllegalTransition { from, to } => {
                AppError::Conflict(format!("order status cannot move from {from} to {to}"))
            }
            StoreError::DuplicateOrderNumber => {
                AppError::Conflict("order number already exists".to_string())
            }
            StoreError::DuplicateDasherEmail => {
                AppError::Conflict("dasher email already registered".to_string())
            }
            StoreError::DuplicateToken => {
                AppError::Conflict("acceptance token already exists".to_string())
            }
        }
    }
}
