// src/handlers/mod.rs
use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{errors::BookingError, state::AppState};

pub mod booking_handler;
pub mod config_handler;
pub mod quote_handler;

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::BadRequest(rejection.body_text())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(config_handler::health))
        .route("/config/payments", get(config_handler::payment_config))
        .route("/quotes", post(quote_handler::create_quote))
        .route("/quotes/:id", get(quote_handler::get_quote))
        .route("/bookings/validate", post(booking_handler::validate_step))
        .route("/bookings/quote", post(booking_handler::quote_draft))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
