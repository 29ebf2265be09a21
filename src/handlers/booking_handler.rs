// src/handlers/booking_handler.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    errors::BookingResult,
    models::{
        booking::Quote,
        draft::{BookingDraft, StepValidationRequest, StepValidationResponse},
    },
    services::booking_service,
    state::AppState,
};

/// Gate for the booking wizard's "Next" button.
pub async fn validate_step(
    payload: Result<Json<StepValidationRequest>, JsonRejection>,
) -> BookingResult<Json<StepValidationResponse>> {
    let Json(StepValidationRequest { step, draft }) = payload?;
    let next_step = booking_service::advance(&draft, step)?;
    Ok(Json(StepValidationResponse { step, next_step }))
}

/// Review step: validate the full draft and issue a quote for it.
pub async fn quote_draft(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingDraft>, JsonRejection>,
) -> BookingResult<(StatusCode, Json<Quote>)> {
    let Json(draft) = payload?;
    let request = booking_service::review(&draft)?;
    let quote = state.pricing_service.quote(request).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}
