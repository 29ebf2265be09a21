// src/state.rs
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::services::{
    pricing_service::{PricingConfig, PricingEngine, PricingOperations, PricingService},
    quote_store::{QuoteStore, QuoteStoreConfig},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: String, value: String },
}

pub struct AppState {
    pub pricing_service: Arc<dyn PricingOperations>,
    pub config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub stripe_publishable_key: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub quote_ttl_seconds: u64,
    pub quote_purge_interval_seconds: u64,
    pub pricing: PricingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            stripe_publishable_key: None,
            cors_allowed_origins: Vec::new(),
            quote_ttl_seconds: QuoteStoreConfig::default().ttl_seconds,
            quote_purge_interval_seconds: 60,
            pricing: PricingConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: T) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn parse_rate(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: f64) -> Result<f64, ConfigError> {
    let value: f64 = parse_var(lookup, var, default)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            var: var.to_string(),
            value: value.to_string(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let pricing_defaults = defaults.pricing.clone();

        let service_fee_rate = parse_rate(&lookup, "PRICING_SERVICE_FEE_RATE", pricing_defaults.service_fee_rate)?;
        if service_fee_rate >= 1.0 {
            return Err(ConfigError::Invalid {
                var: "PRICING_SERVICE_FEE_RATE".to_string(),
                value: service_fee_rate.to_string(),
            });
        }

        let pricing = PricingConfig {
            service_fee_rate,
            tax_rate: parse_rate(&lookup, "PRICING_TAX_RATE", pricing_defaults.tax_rate)?,
            multi_package_fee: parse_rate(&lookup, "PRICING_MULTI_PACKAGE_FEE", pricing_defaults.multi_package_fee)?,
            fuel_rate_per_mile: parse_rate(&lookup, "PRICING_FUEL_RATE_PER_MILE", pricing_defaults.fuel_rate_per_mile)?,
            fuel_fee_floor: parse_rate(&lookup, "PRICING_FUEL_FEE_FLOOR", pricing_defaults.fuel_fee_floor)?,
            valuation_rate: parse_rate(&lookup, "PRICING_VALUATION_RATE", pricing_defaults.valuation_rate)?,
            currency: lookup("PRICING_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or(pricing_defaults.currency),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.cors_allowed_origins);

        let quote_purge_interval_seconds =
            parse_var(&lookup, "QUOTE_PURGE_INTERVAL_SECS", defaults.quote_purge_interval_seconds)?;
        if quote_purge_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                var: "QUOTE_PURGE_INTERVAL_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            stripe_publishable_key: lookup("STRIPE_PUBLISHABLE_KEY").filter(|key| !key.trim().is_empty()),
            cors_allowed_origins,
            quote_ttl_seconds: parse_var(&lookup, "QUOTE_TTL_SECS", defaults.quote_ttl_seconds)?,
            quote_purge_interval_seconds,
            pricing,
        })
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let quotes = Arc::new(QuoteStore::new(QuoteStoreConfig {
            ttl_seconds: config.quote_ttl_seconds,
        }));
        let engine = PricingEngine::new(config.pricing.clone());
        let pricing_service: Arc<dyn PricingOperations> = Arc::new(PricingService::new(engine, quotes));

        if config.stripe_publishable_key.is_none() {
            tracing::warn!("STRIPE_PUBLISHABLE_KEY not set, payment config endpoint will be unavailable");
        }

        Self {
            pricing_service,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.stripe_publishable_key, None);
        assert_eq!(config.quote_ttl_seconds, 900);
        assert_eq!(config.pricing, PricingConfig::default());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
            ("CORS_ALLOWED_ORIGINS", "https://admin.example.com, https://book.example.com,"),
            ("QUOTE_TTL_SECS", "120"),
            ("PRICING_TAX_RATE", "0.08875"),
            ("PRICING_CURRENCY", "usd"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.stripe_publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://admin.example.com", "https://book.example.com"]
        );
        assert_eq!(config.quote_ttl_seconds, 120);
        assert_eq!(config.pricing.tax_rate, 0.08875);
        assert_eq!(config.pricing.currency, "USD");
        assert_eq!(config.pricing.service_fee_rate, 0.055);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("QUOTE_TTL_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "QUOTE_TTL_SECS".to_string(),
                value: "soon".to_string()
            }
        );

        assert!(AppConfig::from_lookup(lookup_from(&[("PRICING_TAX_RATE", "-0.1")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("PRICING_SERVICE_FEE_RATE", "1")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("QUOTE_PURGE_INTERVAL_SECS", "0")])).is_err());
    }

    #[test]
    fn test_blank_publishable_key_is_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("STRIPE_PUBLISHABLE_KEY", "  ")])).unwrap();
        assert_eq!(config.stripe_publishable_key, None);
    }
}
