//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error responses are JSON envelopes:
//!
//! ```json
//! {"error": {"code": "not_found", "message": "Product not found: fig-jam"}}
//! ```
//!
//! Upstream WooCommerce errors pass their HTTP status through where it is
//! meaningful to the client (404 stays 404, 400 stays 400, 429 carries
//! Retry-After); everything else from upstream becomes a 502.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::woo::WooError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// WooCommerce/WordPress API operation failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] WooError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Customer is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with in-flight state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the JSON envelope.
    const fn code(&self) -> &'static str {
        match self {
            Self::Upstream(err) => match err {
                WooError::NotFound(_) => "not_found",
                WooError::RateLimited(_) => "rate_limited",
                WooError::Api { .. } => "upstream_error",
                _ => "upstream_unavailable",
            },
            Self::Cart(err) => match err {
                CartError::LineNotFound(_) => "not_found",
                CartError::InvalidQuantity(_) => "bad_request",
                CartError::NotPurchasable(_) => "not_purchasable",
                CartError::CouponRejected(_) => "coupon_rejected",
                CartError::Upstream(_) => "upstream_unavailable",
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => "empty_cart",
                CheckoutError::InFlight | CheckoutError::Locked => "conflict",
                _ => "upstream_unavailable",
            },
            Self::Session(_) | Self::Internal(_) => "internal",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::RateLimited => "rate_limited",
        }
    }

    /// HTTP status for this error, passing upstream statuses through where
    /// the client can act on them.
    fn status(&self) -> StatusCode {
        match self {
            Self::Upstream(err) => upstream_status(err),
            Self::Cart(err) => cart_status(err),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::InFlight | CheckoutError::Locked => StatusCode::CONFLICT,
                CheckoutError::Cart(inner) => cart_status(inner),
                CheckoutError::Upstream(inner) => upstream_status(inner),
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Client-facing message. Internal details never leave the server.
    fn message(&self) -> String {
        match self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Upstream(err) => match err {
                WooError::NotFound(msg) => format!("Not found: {msg}"),
                WooError::RateLimited(_) => "Rate limited by upstream".to_string(),
                // Upstream 4xx bodies are written for shoppers (coupon
                // rejections, stock messages) - pass them along
                WooError::Api { status, message, .. } if *status < 500 => message.clone(),
                _ => "Store backend unavailable".to_string(),
            },
            Self::Checkout(CheckoutError::InFlight) => {
                "A checkout with this idempotency key is already in progress".to_string()
            }
            Self::Checkout(CheckoutError::Locked) => {
                "Another checkout for this cart is in progress".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Map a cart error to a response status.
fn cart_status(err: &CartError) -> StatusCode {
    match err {
        CartError::LineNotFound(_) => StatusCode::NOT_FOUND,
        CartError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
        CartError::NotPurchasable(_) | CartError::CouponRejected(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CartError::Upstream(inner) => upstream_status(inner),
    }
}

/// Map an upstream error to a response status (the "status passthrough").
fn upstream_status(err: &WooError) -> StatusCode {
    match err {
        WooError::NotFound(_) => StatusCode::NOT_FOUND,
        WooError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        WooError::Api { status, .. } if *status < 500 => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
            }
        }));

        let mut response = (status, body).into_response();

        if let Self::Upstream(WooError::RateLimited(retry_after)) = &self
            && let Ok(value) = HeaderValue::from_str(&retry_after.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with customers.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_passthrough() {
        // Upstream 400 (e.g., invalid coupon payload) stays a 400
        let err = AppError::Upstream(WooError::Api {
            status: 400,
            code: "woocommerce_rest_invalid_coupon".to_string(),
            message: "Invalid coupon".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);

        // Upstream 500 never reaches the client as-is
        let err = AppError::Upstream(WooError::Api {
            status: 500,
            code: "internal_server_error".to_string(),
            message: "boom".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let err = AppError::Upstream(WooError::RateLimited(30));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("30")
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "Internal server error");
    }
}
