// src/services/mod.rs
pub mod booking_service;
pub mod pricing_service;
pub mod quote_store;
