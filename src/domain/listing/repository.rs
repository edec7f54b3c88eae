//! Listing repository interface

use async_trait::async_trait;

use super::model::{Listing, PropertyType};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive exact match
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
    pub host_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        self.city
            .as_deref()
            .map_or(true, |c| listing.city.eq_ignore_ascii_case(c))
            && self
                .property_type
                .map_or(true, |t| listing.property_type == t)
            && self.host_id.map_or(true, |id| listing.host_id == id)
            && self.is_active.map_or(true, |a| listing.is_active == a)
    }
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a new listing and return it with its assigned id
    async fn save(&self, listing: Listing) -> DomainResult<Listing>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>>;

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Listing>>;

    async fn update(&self, listing: Listing) -> DomainResult<()>;

    /// Newest-first page of listings matching `filter`
    async fn find_page(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Listing>>;

    /// Delete every listing; returns the number of rows removed
    async fn delete_all(&self) -> DomainResult<u64>;
}
