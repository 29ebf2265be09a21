// src/services/booking_service.rs
use chrono::{NaiveDate, Utc};

use crate::{
    errors::{BookingError as AppError, ValidationError},
    models::{
        booking::QuoteRequest,
        draft::{BookingDraft, WizardStep},
    },
    utils::geo::ZipDirectory,
};

/// Accumulates field errors for one wizard step.
#[derive(Default)]
struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, value: Option<&str>, label: &str) -> Option<String> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Some(v.to_string()),
            None => {
                self.push(field, format!("{} is required", label));
                None
            }
        }
    }

    fn require_zip(&mut self, field: &str, value: Option<&str>, label: &str) {
        if let Some(zip) = self.require(field, value, label) {
            if ZipDirectory::normalize(&zip).is_none() {
                self.push(field, format!("{} must be a 5-digit ZIP code", label));
            }
        }
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(self.0))
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn phone_digit_count(phone: &str) -> Option<usize> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '+');
    if !phone.chars().all(allowed) {
        return None;
    }
    Some(phone.chars().filter(char::is_ascii_digit).count())
}

fn validate_contact(draft: &BookingDraft, errors: &mut FieldErrors) {
    errors.require("name", draft.name.as_deref(), "Name");

    if let Some(email) = errors.require("email", draft.email.as_deref(), "Email address") {
        if !is_valid_email(&email) {
            errors.push("email", "Email address is not valid");
        }
    }

    if let Some(phone) = errors.require("phone", draft.phone.as_deref(), "Phone number") {
        match phone_digit_count(&phone) {
            Some(10..=15) => {}
            _ => errors.push("phone", "Phone number must have 10 to 15 digits"),
        }
    }
}

fn validate_pickup(draft: &BookingDraft, errors: &mut FieldErrors) {
    errors.require("address", draft.address.as_deref(), "Pickup address");
    errors.require_zip("pickup_zip", draft.pickup_zip.as_deref(), "Pickup ZIP");
}

fn validate_items(draft: &BookingDraft, errors: &mut FieldErrors) {
    if draft.kind.is_donation() {
        return;
    }

    errors.require_zip("store_zip", draft.store_zip.as_deref(), "Store ZIP");

    if draft.items.is_empty() {
        errors.push("items", "Add at least one item");
    }
    for (index, item) in draft.items.iter().enumerate() {
        if item.description.trim().is_empty() {
            errors.push(format!("items[{}].description", index), "Item description is required");
        }
        if !item.declared_value.is_finite() || item.declared_value < 0.0 {
            errors.push(format!("items[{}].declared_value", index), "Item value cannot be negative");
        }
    }
}

fn validate_schedule(draft: &BookingDraft, today: NaiveDate, errors: &mut FieldErrors) {
    if draft.tier.is_none() {
        errors.push("tier", "Choose a pickup speed");
    }
    match draft.pickup_date {
        Some(date) if date < today => errors.push("pickup_date", "Pickup date cannot be in the past"),
        Some(_) => {}
        None => errors.push("pickup_date", "Pickup date is required"),
    }
}

fn validate_review(draft: &BookingDraft, errors: &mut FieldErrors) {
    if !draft.tip.is_finite() || draft.tip < 0.0 {
        errors.push("tip", "Tip cannot be negative");
    }
}

/// Check the fields a step owns. Review also re-checks every earlier step.
pub fn validate_step_on(draft: &BookingDraft, step: WizardStep, today: NaiveDate) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();

    match step {
        WizardStep::Contact => validate_contact(draft, &mut errors),
        WizardStep::Pickup => validate_pickup(draft, &mut errors),
        WizardStep::Items => validate_items(draft, &mut errors),
        WizardStep::Schedule => validate_schedule(draft, today, &mut errors),
        WizardStep::Review => {
            validate_contact(draft, &mut errors);
            validate_pickup(draft, &mut errors);
            validate_items(draft, &mut errors);
            validate_schedule(draft, today, &mut errors);
            validate_review(draft, &mut errors);
        }
    }

    errors.into_result()
}

pub fn validate_step(draft: &BookingDraft, step: WizardStep) -> Result<(), AppError> {
    validate_step_on(draft, step, Utc::now().date_naive())
}

/// Validate the whole draft and turn it into a pricing request.
pub fn review(draft: &BookingDraft) -> Result<QuoteRequest, AppError> {
    validate_step(draft, WizardStep::Review)?;
    draft.to_quote_request()
}

/// Validate `step` and return the step that follows it (`None` after review).
pub fn advance(draft: &BookingDraft, step: WizardStep) -> Result<Option<WizardStep>, AppError> {
    validate_step(draft, step)?;
    tracing::debug!("Booking step {:?} passed validation", step);
    Ok(step.next())
}

impl BookingDraft {
    /// Build the pricing input from a draft that has passed review.
    pub fn to_quote_request(&self) -> Result<QuoteRequest, AppError> {
        let tier = self.tier.ok_or_else(|| AppError::MissingRequiredField("tier".to_string()))?;
        let raw_zip = self
            .pickup_zip
            .as_deref()
            .ok_or_else(|| AppError::MissingRequiredField("pickup_zip".to_string()))?;
        let pickup_zip = ZipDirectory::normalize(raw_zip)
            .ok_or_else(|| AppError::validation_error("pickup_zip", "Pickup ZIP must be a 5-digit ZIP code"))?;

        Ok(QuoteRequest {
            kind: self.kind,
            tier,
            items: self.items.clone(),
            boxes: self.boxes,
            bags: self.bags,
            pickup_zip: pickup_zip.to_string(),
            store_zip: self
                .store_zip
                .as_deref()
                .and_then(ZipDirectory::normalize)
                .map(str::to_string),
            tip: self.tip,
        })
    }
}
