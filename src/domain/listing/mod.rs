//! Listing aggregate

pub mod draft;
pub mod model;
pub mod repository;

pub use draft::{validate_listing, ListingDraft, ListingUpdate};
pub use model::{Listing, PropertyType};
pub use repository::{ListingFilter, ListingRepository};
