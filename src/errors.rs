use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::pricing_service::PricingError;

/// Main error type for the pickup-booking service
#[derive(Debug)]
pub enum BookingError {
    // Malformed request bodies
    BadRequest(String),

    // Business logic errors
    QuoteNotFound(String),
    InvalidQuoteId(String),
    Pricing(PricingError),

    // Validation errors
    ValidationFailed(Vec<ValidationError>),
    MissingRequiredField(String),

    ServiceUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::BadRequest(msg) => write!(f, "Bad request: {}", msg),

            BookingError::QuoteNotFound(id) => write!(f, "Quote not found: {}", id),
            BookingError::InvalidQuoteId(id) => write!(f, "Invalid quote ID: {}", id),
            BookingError::Pricing(err) => write!(f, "Pricing error: {}", err),

            BookingError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            BookingError::MissingRequiredField(field) => write!(f, "Missing required field: {}", field),

            BookingError::ServiceUnavailable(service) => write!(f, "Service unavailable: {}", service),
        }
    }
}

impl std::error::Error for BookingError {}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            BookingError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),

            BookingError::ValidationFailed(errors) => {
                let details = serde_json::to_value(&errors).ok();
                (StatusCode::BAD_REQUEST, "validation_failed", "Validation errors occurred".to_string(), details)
            }
            BookingError::MissingRequiredField(field) => {
                (StatusCode::BAD_REQUEST, "missing_field", format!("Missing required field: {}", field), None)
            }
            BookingError::Pricing(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "pricing_rejected", err.to_string(), None)
            }

            BookingError::QuoteNotFound(id) => {
                (StatusCode::NOT_FOUND, "quote_not_found", format!("Quote not found: {}", id), None)
            }
            BookingError::InvalidQuoteId(id) => {
                (StatusCode::BAD_REQUEST, "invalid_quote_id", format!("Invalid quote ID: {}", id), None)
            }

            BookingError::ServiceUnavailable(service) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", format!("Service unavailable: {}", service), None)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        }

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

// Convenience type alias for Results
pub type BookingResult<T> = Result<T, BookingError>;

impl From<PricingError> for BookingError {
    fn from(err: PricingError) -> Self {
        BookingError::Pricing(err)
    }
}

// Helper functions for creating common errors
impl BookingError {
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn quote_not_found(quote_id: impl Into<String>) -> Self {
        BookingError::QuoteNotFound(quote_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_display() {
        let error = BookingError::QuoteNotFound("quo-241019-abc12".to_string());
        assert_eq!(error.to_string(), "Quote not found: quo-241019-abc12");
    }

    #[test]
    fn test_validation_error() {
        let error = BookingError::validation_error("pickup_zip", "ZIP code must be 5 digits");
        match error {
            BookingError::ValidationFailed(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "pickup_zip");
                assert_eq!(errors[0].message, "ZIP code must be 5 digits");
            }
            _ => panic!("Expected ValidationFailed error"),
        }
    }

    #[test]
    fn test_pricing_error_conversion() {
        let error: BookingError = PricingError::InvalidTip(-1.0).into();
        assert!(matches!(error, BookingError::Pricing(PricingError::InvalidTip(_))));
        assert!(matches!(BookingError::quote_not_found("test"), BookingError::QuoteNotFound(_)));
    }

    #[tokio::test]
    async fn test_validation_response_carries_details() {
        let response = BookingError::validation_error("email", "Email address is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "validation_failed");
        assert_eq!(json["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_status_codes() {
        let cases = [
            (BookingError::BadRequest("eof".to_string()), StatusCode::BAD_REQUEST),
            (BookingError::MissingRequiredField("tier".to_string()), StatusCode::BAD_REQUEST),
            (BookingError::Pricing(PricingError::InvalidTip(-1.0)), StatusCode::UNPROCESSABLE_ENTITY),
            (BookingError::ServiceUnavailable("payments".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
