//! Booking repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Booking, BookingStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

/// Optional filters for listing bookings. Empty filter = all bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub guest_id: Option<i32>,
    pub listing_id: Option<i32>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.guest_id.map_or(true, |id| booking.guest_id == id)
            && self.listing_id.map_or(true, |id| booking.listing_id == id)
            && self.status.map_or(true, |s| booking.status == s)
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking and return it with its assigned id
    async fn save(&self, booking: Booking) -> DomainResult<Booking>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Overwrite an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Newest-first page of bookings matching `filter`
    async fn find_page(
        &self,
        filter: BookingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>>;

    /// Non-cancelled bookings of a listing that intersect `[check_in, check_out)`
    async fn find_overlapping(
        &self,
        listing_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Booking>>;

    /// Delete every booking; returns the number of rows removed
    async fn delete_all(&self) -> DomainResult<u64>;
}
