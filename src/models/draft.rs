// src/models/draft.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::booking::{BookingItem, BookingKind, ServiceTier};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Contact,
    Pickup,
    Items,
    Schedule,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Contact,
        WizardStep::Pickup,
        WizardStep::Items,
        WizardStep::Schedule,
        WizardStep::Review,
    ];

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Contact => Some(WizardStep::Pickup),
            WizardStep::Pickup => Some(WizardStep::Items),
            WizardStep::Items => Some(WizardStep::Schedule),
            WizardStep::Schedule => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }
}

/// Partially filled booking, as the customer builds it page by page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BookingDraft {
    pub kind: BookingKind,

    // Contact
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    // Pickup
    pub address: Option<String>,
    pub pickup_zip: Option<String>,
    pub instructions: Option<String>,

    // Items
    pub store_zip: Option<String>,
    pub items: Vec<BookingItem>,
    pub boxes: u32,
    pub bags: u32,

    // Schedule
    pub tier: Option<ServiceTier>,
    pub pickup_date: Option<NaiveDate>,

    // Review
    pub tip: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StepValidationRequest {
    pub step: WizardStep,
    pub draft: BookingDraft,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StepValidationResponse {
    pub step: WizardStep,
    pub next_step: Option<WizardStep>,
}
