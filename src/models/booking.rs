// src/models/booking.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::geo::DistanceSource;
use crate::utils::money::round_cents;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTier {
    Standard, // Pickup within the scheduled window
    Priority, // Pickup within a few hours
    Instant,  // Next available driver
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemSize {
    Small,      // Fits in a mailer or shoebox
    Medium,     // Carry-on sized
    Large,      // Needs both hands
    ExtraLarge, // Two-person or oversized items
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    #[default]
    Return,
    Exchange,
    Donation, // Waives every fee except the tip
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingItem {
    pub description: String,
    pub size: ItemSize,
    #[serde(default)]
    pub declared_value: f64,
}

// Request/Response Models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuoteRequest {
    #[serde(default)]
    pub kind: BookingKind,
    pub tier: ServiceTier,
    #[serde(default)]
    pub items: Vec<BookingItem>,
    #[serde(default)]
    pub boxes: u32,
    #[serde(default)]
    pub bags: u32,
    pub pickup_zip: String,
    #[serde(default)]
    pub store_zip: Option<String>,
    #[serde(default)]
    pub tip: f64,
}

/// Full-precision breakdown. Serializes as [`CentBreakdown`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(into = "CentBreakdown")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub size_upcharges: f64,
    pub multi_package_fee: f64,
    pub valuation_fee: f64,
    pub subtotal: f64,
    pub distance_miles: f64,
    pub distance_source: DistanceSource,
    pub fuel_fee: f64,
    pub tax: f64,
    pub tip: f64,
    pub service_fee: f64,
    pub total: f64,
    pub driver_payout: f64,
}

/// Breakdown as shown to customers. Every line is in whole cents and the
/// lines add up to `subtotal` and `total`; the service fee absorbs the
/// rounding difference.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CentBreakdown {
    pub base_price: f64,
    pub size_upcharges: f64,
    pub multi_package_fee: f64,
    pub valuation_fee: f64,
    pub subtotal: f64,
    pub distance_miles: f64,
    pub distance_source: DistanceSource,
    pub fuel_fee: f64,
    pub tax: f64,
    pub tip: f64,
    pub service_fee: f64,
    pub total: f64,
    pub driver_payout: f64,
}

impl From<PriceBreakdown> for CentBreakdown {
    fn from(b: PriceBreakdown) -> Self {
        let base_price = round_cents(b.base_price);
        let size_upcharges = round_cents(b.size_upcharges);
        let multi_package_fee = round_cents(b.multi_package_fee);
        let valuation_fee = round_cents(b.valuation_fee);
        let subtotal = round_cents(base_price + size_upcharges + multi_package_fee + valuation_fee);

        let fuel_fee = round_cents(b.fuel_fee);
        let tax = round_cents(b.tax);
        let tip = round_cents(b.tip);
        let total = round_cents(b.total);
        let service_fee = round_cents(total - (subtotal + fuel_fee + tax + tip));

        Self {
            base_price,
            size_upcharges,
            multi_package_fee,
            valuation_fee,
            subtotal,
            distance_miles: b.distance_miles,
            distance_source: b.distance_source,
            fuel_fee,
            tax,
            tip,
            service_fee,
            total,
            driver_payout: round_cents(b.driver_payout),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quote {
    pub id: String,
    pub request: QuoteRequest,
    pub breakdown: PriceBreakdown,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// Helper implementations
impl ServiceTier {
    pub fn base_price(&self) -> f64 {
        match self {
            ServiceTier::Standard => 9.99,
            ServiceTier::Priority => 14.99,
            ServiceTier::Instant => 24.99,
        }
    }

    pub fn driver_payout(&self) -> f64 {
        match self {
            ServiceTier::Standard => 6.00,
            ServiceTier::Priority => 9.00,
            ServiceTier::Instant => 15.00,
        }
    }
}

impl ItemSize {
    pub fn upcharge(&self) -> f64 {
        match self {
            ItemSize::Small => 0.0,
            ItemSize::Medium => 2.0,
            ItemSize::Large => 5.0,
            ItemSize::ExtraLarge => 10.0,
        }
    }
}

impl BookingKind {
    pub fn is_donation(&self) -> bool {
        matches!(self, BookingKind::Donation)
    }
}

impl QuoteRequest {
    pub fn package_count(&self) -> u32 {
        self.boxes.saturating_add(self.bags)
    }

    pub fn declared_value_total(&self) -> f64 {
        self.items.iter().fold(0.0, |acc, item| acc + item.declared_value)
    }
}

impl Quote {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
