//! Booking aggregate
//!
//! Pricing, request validation and lifecycle rules for reservations,
//! plus the repository interface.

pub mod error;
pub mod model;
pub mod pricing;
pub mod repository;
pub mod validation;

pub use error::BookingError;
pub use model::{Booking, BookingStatus};
pub use pricing::{nights_between, quote, PriceQuote};
pub use repository::{BookingFilter, BookingRepository};
pub use validation::{validate_request, validate_stay, BookingRequest};
