// src/handlers/quote_handler.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    errors::BookingResult,
    models::booking::{Quote, QuoteRequest},
    state::AppState,
};

pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> BookingResult<(StatusCode, Json<Quote>)> {
    let Json(request) = payload?;
    let quote = state.pricing_service.quote(request).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(quote_id): Path<String>,
) -> BookingResult<Json<Quote>> {
    let quote = state.pricing_service.get_quote(&quote_id).await?;
    Ok(Json(quote))
}
