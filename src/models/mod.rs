// src/models/mod.rs
pub mod booking;
pub mod draft;

pub use booking::*;
pub use draft::*;
