//! Unified error handling.
//!
//! Every service returns `Result<T, AppError>`; the variant decides the HTTP
//! status once, here, and the body is always the JSON envelope
//! `{"success": false, "message": ...}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

use crate::services::notification::NotificationError;
use crate::services::payment_gateway::GatewayError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or missing token.
    #[error("{0}")]
    Unauthorized(String),

    /// Token present but invalid or expired.
    #[error("{0}")]
    Forbidden(String),

    /// Missing resource, or a resource owned by someone else.
    #[error("{0}")]
    NotFound(String),

    /// Business rule violation (empty cart, order already cancelled, ...).
    #[error("{0}")]
    InvalidState(String),

    #[error("{message}")]
    InsufficientStock {
        message: String,
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Invalid payment signature")]
    SignatureInvalid,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Email delivery error: {0}")]
    Notification(#[from] NotificationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        Self::Validation(message)
    }
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// Checkout shortage, named after the product that ran out.
    pub fn insufficient_stock(product: &str, available: i32, requested: i32) -> Self {
        Self::stock_shortage(format!("Insufficient stock for {product}"), product, available, requested)
    }

    pub fn stock_shortage(message: impl Into<String>, product: &str, available: i32, requested: i32) -> Self {
        Self::InsufficientStock {
            message: message.into(),
            product: product.to_string(),
            available,
            requested,
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Gateway(_) | Self::Notification(_) | Self::Internal(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidState(_)
            | Self::InsufficientStock { .. }
            | Self::SignatureInvalid => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Notification(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut body = serde_json::json!({
            "success": false,
            "message": message,
        });

        if let Self::InsufficientStock { product, available, requested, .. } = self {
            body["product"] = product.as_str().into();
            body["available"] = (*available).into();
            body["requested"] = (*requested).into();
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}
