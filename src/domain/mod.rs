pub mod booking;
pub mod listing;
pub mod repositories;
pub mod review;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingError, BookingStatus};
pub use listing::{Listing, PropertyType};
pub use repositories::{DomainResult, RepositoryProvider};
pub use review::{RatingSummary, Review, ReviewError};
pub use user::User;

pub use crate::shared::errors::DomainError;
