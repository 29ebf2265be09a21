// src/services/quote_store.rs
use chrono::{DateTime, Duration, Utc};
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;

use crate::models::booking::Quote;

#[derive(Debug, Clone)]
pub struct QuoteStoreConfig {
    pub ttl_seconds: u64,
}

impl Default for QuoteStoreConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 900, // 15 minutes
        }
    }
}

/// In-memory quote store. Entries expire `ttl_seconds` after they are issued.
pub struct QuoteStore {
    store: RwLock<HashMap<String, Quote>>,
    config: QuoteStoreConfig,
}

impl QuoteStore {
    pub fn new(config: QuoteStoreConfig) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn ttl(&self) -> Duration {
        i64::try_from(self.config.ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    pub fn expiry_for(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at
            .checked_add_signed(self.ttl())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Store a quote under its ID. Returns `false`, leaving the stored
    /// quote untouched, if the ID is already taken.
    pub async fn try_insert(&self, quote: &Quote) -> bool {
        let mut store = self.store.write().await;
        match store.entry(quote.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(quote.clone());
                true
            }
        }
    }

    pub async fn get(&self, quote_id: &str) -> Option<Quote> {
        self.get_at(quote_id, Utc::now()).await
    }

    pub async fn get_at(&self, quote_id: &str, now: DateTime<Utc>) -> Option<Quote> {
        let store = self.store.read().await;
        store
            .get(quote_id)
            .filter(|quote| !quote.is_expired_at(now))
            .cloned()
    }

    /// Drop expired quotes, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, quote| !quote.is_expired_at(now));
        before - store.len()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingKind, PriceBreakdown, QuoteRequest, ServiceTier};
    use crate::utils::geo::DistanceSource;

    fn quote(id: &str, created_at: DateTime<Utc>, store: &QuoteStore) -> Quote {
        Quote {
            id: id.to_string(),
            request: QuoteRequest {
                kind: BookingKind::Donation,
                tier: ServiceTier::Standard,
                items: vec![],
                boxes: 0,
                bags: 0,
                pickup_zip: "10001".to_string(),
                store_zip: None,
                tip: 5.0,
            },
            breakdown: PriceBreakdown {
                base_price: 0.0,
                size_upcharges: 0.0,
                multi_package_fee: 0.0,
                valuation_fee: 0.0,
                subtotal: 0.0,
                distance_miles: 0.0,
                distance_source: DistanceSource::Fallback,
                fuel_fee: 0.0,
                tax: 0.0,
                tip: 5.0,
                service_fee: 0.0,
                total: 5.0,
                driver_payout: 5.0,
            },
            currency: "USD".to_string(),
            created_at,
            expires_at: store.expiry_for(created_at),
        }
    }

    #[tokio::test]
    async fn test_get_returns_live_quote() {
        let store = QuoteStore::new(QuoteStoreConfig::default());
        let now = Utc::now();
        assert!(store.try_insert(&quote("quo-241019-aaaaa", now, &store)).await);

        let found = store.get_at("quo-241019-aaaaa", now).await;
        assert_eq!(found.map(|q| q.id), Some("quo-241019-aaaaa".to_string()));
        assert!(store.get_at("quo-241019-bbbbb", now).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_quote_is_hidden_and_purged() {
        let store = QuoteStore::new(QuoteStoreConfig { ttl_seconds: 60 });
        let issued = Utc::now();
        store.try_insert(&quote("quo-241019-old01", issued, &store)).await;
        store
            .try_insert(&quote("quo-241019-new01", issued + Duration::seconds(120), &store))
            .await;

        let later = issued + Duration::seconds(90);
        assert!(store.get_at("quo-241019-old01", later).await.is_none());
        assert!(store.get_at("quo-241019-new01", later).await.is_some());

        assert_eq!(store.purge_expired_at(later).await, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_keeps_first_quote() {
        let store = QuoteStore::new(QuoteStoreConfig::default());
        let now = Utc::now();
        let first = quote("quo-241019-dup01", now, &store);
        let mut second = quote("quo-241019-dup01", now, &store);
        second.breakdown.tip = 9.0;

        assert!(store.try_insert(&first).await);
        assert!(!store.try_insert(&second).await);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get_at("quo-241019-dup01", now).await, Some(first));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let store = QuoteStore::new(QuoteStoreConfig { ttl_seconds: u64::MAX });
        let issued = Utc::now();
        assert!(store.expiry_for(issued) > issued);
    }
}
