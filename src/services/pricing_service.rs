// src/services/pricing_service.rs
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    errors::BookingError as AppError,
    models::booking::{PriceBreakdown, Quote, QuoteRequest},
    services::quote_store::QuoteStore,
    utils::{
        geo::{DistanceEstimate, DistanceSource, ZipDirectory},
        id_generator::{IdGenerator, IdType},
    },
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("tip must be a finite, non-negative amount (got {0})")]
    InvalidTip(f64),

    #[error("declared value of item {index} must be a finite, non-negative amount (got {value})")]
    InvalidDeclaredValue { index: usize, value: f64 },

    #[error("booking amounts are too large to price (got {0})")]
    AmountOutOfRange(f64),

    #[error("service fee rate must be in [0, 1) (got {0})")]
    InvalidServiceFeeRate(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    pub service_fee_rate: f64,
    pub tax_rate: f64,
    pub multi_package_fee: f64,
    pub fuel_rate_per_mile: f64,
    pub fuel_fee_floor: f64,
    pub valuation_rate: f64,
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: 0.055,  // Share of the final total
            tax_rate: 0.0625,         // Applied to the subtotal only
            multi_package_fee: 3.00,  // Per box/bag beyond the first
            fuel_rate_per_mile: 0.35,
            fuel_fee_floor: 1.25,
            valuation_rate: 0.01,     // Of total declared item value
            currency: "USD".to_string(),
        }
    }
}

/// Stateless booking calculator.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
    zips: ZipDirectory,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self {
            config,
            zips: ZipDirectory::new(),
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn multi_package_fee(&self, packages: u32) -> f64 {
        if packages > 1 {
            f64::from(packages - 1) * self.config.multi_package_fee
        } else {
            0.0
        }
    }

    pub fn fuel_fee(&self, distance_miles: f64) -> f64 {
        (distance_miles * self.config.fuel_rate_per_mile).max(self.config.fuel_fee_floor)
    }

    /// Fee that ends up as exactly `service_fee_rate` of the final total.
    pub fn reverse_solved_fee(&self, pre_fee_total: f64) -> f64 {
        let rate = self.config.service_fee_rate;
        pre_fee_total * rate / (1.0 - rate)
    }

    fn distance(&self, request: &QuoteRequest) -> DistanceEstimate {
        match request.store_zip.as_deref() {
            Some(store_zip) => self.zips.distance_miles(&request.pickup_zip, store_zip),
            None => DistanceEstimate {
                miles: 0.0,
                source: DistanceSource::Fallback,
            },
        }
    }

    fn check_tip(&self, request: &QuoteRequest) -> Result<(), PricingError> {
        let rate = self.config.service_fee_rate;
        if !(0.0..1.0).contains(&rate) {
            return Err(PricingError::InvalidServiceFeeRate(rate));
        }
        if !request.tip.is_finite() || request.tip < 0.0 {
            return Err(PricingError::InvalidTip(request.tip));
        }
        Ok(())
    }

    fn check_items(&self, request: &QuoteRequest) -> Result<(), PricingError> {
        if let Some((index, item)) = request
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| !item.declared_value.is_finite() || item.declared_value < 0.0)
        {
            return Err(PricingError::InvalidDeclaredValue {
                index,
                value: item.declared_value,
            });
        }
        let declared = request.declared_value_total();
        if !declared.is_finite() {
            return Err(PricingError::AmountOutOfRange(declared));
        }
        Ok(())
    }

    pub fn calculate(&self, request: &QuoteRequest) -> Result<PriceBreakdown, PricingError> {
        self.check_tip(request)?;
        let tip = request.tip;

        // Item fields play no part in a donation's price
        if request.kind.is_donation() {
            return Ok(PriceBreakdown {
                base_price: 0.0,
                size_upcharges: 0.0,
                multi_package_fee: 0.0,
                valuation_fee: 0.0,
                subtotal: 0.0,
                distance_miles: 0.0,
                distance_source: DistanceSource::Fallback,
                fuel_fee: 0.0,
                tax: 0.0,
                tip,
                service_fee: 0.0,
                total: tip,
                driver_payout: tip,
            });
        }

        self.check_items(request)?;

        let base_price = request.tier.base_price();
        let size_upcharges = request
            .items
            .iter()
            .fold(0.0, |acc, item| acc + item.size.upcharge());
        let multi_package_fee = self.multi_package_fee(request.package_count());
        let valuation_fee = request.declared_value_total() * self.config.valuation_rate;
        let subtotal = base_price + size_upcharges + multi_package_fee + valuation_fee;

        let distance = self.distance(request);
        let fuel_fee = self.fuel_fee(distance.miles);
        let tax = subtotal * self.config.tax_rate;

        let pre_fee_total = subtotal + fuel_fee + tax + tip;
        let service_fee = self.reverse_solved_fee(pre_fee_total);
        let total = pre_fee_total + service_fee;
        if !total.is_finite() {
            return Err(PricingError::AmountOutOfRange(total));
        }

        Ok(PriceBreakdown {
            base_price,
            size_upcharges,
            multi_package_fee,
            valuation_fee,
            subtotal,
            distance_miles: distance.miles,
            distance_source: distance.source,
            fuel_fee,
            tax,
            tip,
            service_fee,
            total,
            driver_payout: request.tier.driver_payout() + tip,
        })
    }
}

#[async_trait]
pub trait PricingOperations: Send + Sync {
    async fn quote(&self, request: QuoteRequest) -> Result<Quote, AppError>;
    async fn get_quote(&self, quote_id: &str) -> Result<Quote, AppError>;
    async fn purge_expired_quotes(&self) -> usize;
}

pub struct PricingService {
    engine: PricingEngine,
    quotes: Arc<QuoteStore>,
}

impl PricingService {
    pub fn new(engine: PricingEngine, quotes: Arc<QuoteStore>) -> Self {
        Self { engine, quotes }
    }
}

#[async_trait]
impl PricingOperations for PricingService {
    async fn quote(&self, request: QuoteRequest) -> Result<Quote, AppError> {
        tracing::debug!("Calculating quote: {:?} {:?} from {}", request.kind, request.tier, request.pickup_zip);

        let breakdown = self.engine.calculate(&request)?;
        if breakdown.distance_source == DistanceSource::Fallback && !request.kind.is_donation() {
            tracing::warn!(
                "Distance unavailable for {} -> {:?}, fuel fee floored",
                request.pickup_zip,
                request.store_zip
            );
        }

        let created_at = Utc::now();
        let mut quote = Quote {
            id: IdGenerator::generate_with_timestamp(IdType::Quote, created_at),
            request,
            breakdown,
            currency: self.engine.config().currency.clone(),
            created_at,
            expires_at: self.quotes.expiry_for(created_at),
        };

        while !self.quotes.try_insert(&quote).await {
            tracing::warn!("Quote ID {} already issued, regenerating", quote.id);
            quote.id = IdGenerator::generate_with_timestamp(IdType::Quote, created_at);
        }

        tracing::info!("Quote issued: {} - {:.2} {}", quote.id, quote.breakdown.total, quote.currency);

        Ok(quote)
    }

    async fn get_quote(&self, quote_id: &str) -> Result<Quote, AppError> {
        if !IdGenerator::validate_id(quote_id, Some(IdType::Quote)) {
            tracing::warn!("Invalid quote ID format: {}", quote_id);
            return Err(AppError::InvalidQuoteId(quote_id.to_string()));
        }

        self.quotes
            .get(quote_id)
            .await
            .ok_or_else(|| AppError::quote_not_found(quote_id))
    }

    async fn purge_expired_quotes(&self) -> usize {
        let removed = self.quotes.purge_expired().await;
        if removed > 0 {
            tracing::debug!("Purged {} expired quotes, {} live", removed, self.quotes.len().await);
        }
        removed
    }
}
