//! Review aggregate
//!
//! Guest reviews of completed stays, the eligibility rules for writing one,
//! and the per-listing rating aggregate.

pub mod eligibility;
pub mod model;
pub mod rating;
pub mod repository;

pub use eligibility::{check_eligibility, ReviewError, ReviewSubmission, MAX_RATING, MIN_RATING};
pub use model::Review;
pub use rating::RatingSummary;
pub use repository::{ReviewFilter, ReviewRepository};
