//! Review repository interface

use std::collections::HashMap;

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub listing_id: Option<i32>,
    pub reviewer_id: Option<i32>,
}

impl ReviewFilter {
    pub fn for_listing(listing_id: i32) -> Self {
        Self {
            listing_id: Some(listing_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, review: &Review) -> bool {
        self.listing_id.map_or(true, |id| review.listing_id == id)
            && self.reviewer_id.map_or(true, |id| review.reviewer_id == id)
    }
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review. A second review for the same booking fails
    /// with `ReviewError::DuplicateReview`.
    async fn save(&self, review: Review) -> DomainResult<Review>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Review>>;

    async fn update(&self, review: Review) -> DomainResult<()>;

    /// Newest-first page of reviews matching `filter`
    async fn find_page(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Review>>;

    async fn exists_for_booking(&self, booking_id: i32) -> DomainResult<bool>;

    /// All ratings per listing for the given listing ids.
    /// Listings without reviews are absent from the map.
    async fn ratings_for_listings(&self, listing_ids: &[i32])
        -> DomainResult<HashMap<i32, Vec<i32>>>;

    async fn delete_all(&self) -> DomainResult<u64>;
}
