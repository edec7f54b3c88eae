//! Bookings module: reservation creation, status changes and cancellation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
