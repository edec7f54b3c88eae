//! Application layer: use-cases orchestrating the domain and repositories

pub mod bookings;
pub mod identity;
pub mod listings;
pub mod reviews;
pub mod seed;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use bookings::BookingService;
pub use identity::UserService;
pub use listings::ListingService;
pub use reviews::ReviewService;
pub use seed::{SeedReport, Seeder};
pub use views::{BookingView, ListingView, ReviewView};
