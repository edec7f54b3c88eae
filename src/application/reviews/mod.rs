//! Review use-cases

pub mod service;

pub use service::ReviewService;
