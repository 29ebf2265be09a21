pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;


// Re-export commonly used types
pub use errors::{BookingError, BookingResult, ValidationError};
pub use handlers::router;
pub use services::pricing_service::{PricingConfig, PricingEngine, PricingError};
