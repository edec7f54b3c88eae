//! Listings module: listing CRUD, price quotes and listing reviews

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
