//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::payment::PaymentRejection;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Payment(#[from] PaymentRejection),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Pricing(e) => match e {
                PricingError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
                PricingError::InvalidCoupon { .. } => (StatusCode::BAD_REQUEST, "invalid_coupon"),
                PricingError::CouponNotFound { .. } => (StatusCode::NOT_FOUND, "coupon_not_found"),
                PricingError::BikeNotFound { .. } => (StatusCode::NOT_FOUND, "bike_not_found"),
                PricingError::BikeUnavailable { .. } => (StatusCode::CONFLICT, "bike_unavailable"),
                PricingError::NotInCart { .. } => (StatusCode::NOT_FOUND, "not_in_cart"),
            },
            AppError::Payment(_) => (StatusCode::UNPROCESSABLE_ENTITY, "payment_rejected"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            AppError::Payment(rejection) => rejection.to_string(),
            other => other.to_string(),
        };

        let details = match &self {
            AppError::Pricing(PricingError::InvalidInput {
                index: Some(index), ..
            }) => Some(serde_json::json!({ "line": index })),
            AppError::Payment(rejection) => Some(serde_json::json!({ "field": rejection.field() })),
            _ => None,
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
