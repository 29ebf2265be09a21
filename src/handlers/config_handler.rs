// src/handlers/config_handler.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    errors::{BookingError, BookingResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PaymentConfig {
    pub publishable_key: String,
    pub currency: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Client-side payment confirmation needs the provider's publishable key.
pub async fn payment_config(State(state): State<Arc<AppState>>) -> BookingResult<Json<PaymentConfig>> {
    let publishable_key = state
        .config
        .stripe_publishable_key
        .clone()
        .ok_or_else(|| BookingError::ServiceUnavailable("payments".to_string()))?;

    Ok(Json(PaymentConfig {
        publishable_key,
        currency: state.config.pricing.currency.to_lowercase(),
    }))
}
