//! Booking use-cases
//!
//! Creation runs the request through validation and pricing before
//! anything is written. Status changes are not guarded except for the
//! explicit cancel action.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::views::{booking_view, booking_views, BookingView};
use crate::domain::booking::{
    quote, validate_request, validate_stay, BookingFilter, BookingRequest, PriceQuote,
};
use crate::domain::{Booking, BookingError, BookingStatus, DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams, SharedClock};

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    strict_overlap_check: bool,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self {
            repos,
            clock,
            strict_overlap_check: false,
        }
    }

    /// Reject new bookings that intersect a non-cancelled booking of the same listing.
    pub fn with_strict_overlap_check(mut self, enabled: bool) -> Self {
        self.strict_overlap_check = enabled;
        self
    }

    /// Reference day for derived booking fields
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn rejected(&self, err: BookingError) -> DomainError {
        metrics::counter!("bookings_rejected_total", "reason" => err.reason()).increment(1);
        err.into()
    }

    pub async fn create(&self, request: BookingRequest) -> DomainResult<BookingView> {
        let listing = self
            .repos
            .listings()
            .find_by_id(request.listing_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", request.listing_id))?;
        if self.repos.users().get_user_by_id(request.guest_id).await?.is_none() {
            return Err(DomainError::not_found("User", request.guest_id));
        }

        let today = self.clock.today();
        if let Err(e) = validate_request(&request, today) {
            warn!(listing_id = request.listing_id, guest_id = request.guest_id, reason = e.reason(), "Booking request rejected");
            return Err(self.rejected(e));
        }

        if self.strict_overlap_check {
            let clashes = self
                .repos
                .bookings()
                .find_overlapping(request.listing_id, request.check_in, request.check_out)
                .await?;
            if !clashes.is_empty() {
                warn!(
                    listing_id = request.listing_id,
                    clashes = clashes.len(),
                    "Booking request overlaps existing bookings"
                );
                return Err(self.rejected(BookingError::Conflict {
                    listing_id: request.listing_id,
                    check_in: request.check_in,
                    check_out: request.check_out,
                }));
            }
        }

        let price = quote(listing.price_per_night, request.check_in, request.check_out)
            .map_err(|e| self.rejected(e))?;
        let booking = Booking::pending(&request, price, self.clock.now());
        let booking = self.repos.bookings().save(booking).await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = booking.id,
            listing_id = booking.listing_id,
            guest_id = booking.guest_id,
            nights = price.num_nights,
            total_price = %booking.total_price,
            "Booking created"
        );

        booking_view(self.repos.as_ref(), booking).await
    }

    /// Price a prospective stay without persisting anything.
    pub async fn quote(
        &self,
        listing_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        num_guests: i32,
    ) -> DomainResult<PriceQuote> {
        let listing = self
            .repos
            .listings()
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", listing_id))?;
        validate_stay(check_in, check_out, num_guests, self.clock.today())?;
        Ok(quote(listing.price_per_night, check_in, check_out)?)
    }

    async fn load(&self, id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))
    }

    pub async fn get(&self, id: i32) -> DomainResult<BookingView> {
        let booking = self.load(id).await?;
        booking_view(self.repos.as_ref(), booking).await
    }

    pub async fn list(
        &self,
        filter: BookingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<BookingView>> {
        let mut result = self.repos.bookings().find_page(filter, page).await?;
        let items = booking_views(self.repos.as_ref(), std::mem::take(&mut result.items)).await?;
        Ok(result.with_items(items))
    }

    /// Replace the status with no transition check.
    pub async fn set_status(&self, id: i32, status: BookingStatus) -> DomainResult<BookingView> {
        let mut booking = self.load(id).await?;
        let previous = booking.status;
        booking.set_status(status, self.clock.now());
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id = id, from = %previous, to = %status, "Booking status changed");
        booking_view(self.repos.as_ref(), booking).await
    }

    /// Cancel while the cancellation window is open.
    pub async fn cancel(&self, id: i32) -> DomainResult<BookingView> {
        let mut booking = self.load(id).await?;
        if let Err(e) = booking.cancel(self.clock.now()) {
            warn!(booking_id = id, status = %booking.status, "Cancellation refused");
            return Err(e.into());
        }
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id = id, "Booking cancelled");
        booking_view(self.repos.as_ref(), booking).await
    }
}
