//! Listing use-cases

pub mod service;

pub use service::ListingService;
