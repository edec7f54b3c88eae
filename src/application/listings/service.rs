//! Listing use-cases

use std::sync::Arc;

use tracing::info;

use crate::application::views::{listing_view, listing_views, ListingView};
use crate::domain::listing::{ListingDraft, ListingFilter, ListingUpdate};
use crate::domain::review::ReviewFilter;
use crate::domain::{DomainError, DomainResult, Listing, RatingSummary, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams, SharedClock};

pub struct ListingService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl ListingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    async fn load(&self, id: i32) -> DomainResult<Listing> {
        self.repos
            .listings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", id))
    }

    pub async fn create(&self, draft: ListingDraft) -> DomainResult<ListingView> {
        if self.repos.users().get_user_by_id(draft.host_id).await?.is_none() {
            return Err(DomainError::not_found("User", draft.host_id));
        }
        let listing = draft.into_listing(self.clock.now())?;
        let listing = self.repos.listings().save(listing).await?;

        info!(listing_id = listing.id, host_id = listing.host_id, city = %listing.city, "Listing created");
        listing_view(self.repos.as_ref(), listing).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<ListingView> {
        let listing = self.load(id).await?;
        listing_view(self.repos.as_ref(), listing).await
    }

    pub async fn list(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<ListingView>> {
        let mut result = self.repos.listings().find_page(filter, page).await?;
        let items = listing_views(self.repos.as_ref(), std::mem::take(&mut result.items)).await?;
        Ok(result.with_items(items))
    }

    pub async fn update(&self, id: i32, update: ListingUpdate) -> DomainResult<ListingView> {
        let mut listing = self.load(id).await?;
        update.apply(&mut listing, self.clock.now())?;
        self.repos.listings().update(listing.clone()).await?;

        info!(listing_id = id, "Listing updated");
        listing_view(self.repos.as_ref(), listing).await
    }

    /// Soft delete: the listing stays, marked inactive.
    pub async fn deactivate(&self, id: i32) -> DomainResult<ListingView> {
        let mut listing = self.load(id).await?;
        listing.deactivate(self.clock.now());
        self.repos.listings().update(listing.clone()).await?;

        info!(listing_id = id, "Listing deactivated");
        listing_view(self.repos.as_ref(), listing).await
    }

    /// Rating aggregate computed from every review of the listing.
    pub async fn rating(&self, id: i32) -> DomainResult<RatingSummary> {
        self.load(id).await?;
        let mut ratings = self.repos.reviews().ratings_for_listings(&[id]).await?;
        Ok(RatingSummary::from_ratings(
            ratings.remove(&id).unwrap_or_default(),
        ))
    }

    /// Reviews filter pinned to an existing listing.
    pub async fn reviews_filter(&self, id: i32) -> DomainResult<ReviewFilter> {
        self.load(id).await?;
        Ok(ReviewFilter::for_listing(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::testing::{clock, draft, fixture};
    use crate::domain::listing::PropertyType;
    use crate::domain::{Booking, BookingStatus, Review};

    #[tokio::test]
    async fn create_requires_existing_host() {
        let fx = fixture().await;
        let svc = ListingService::new(fx.store.clone(), clock());

        let err = svc.create(draft(999, 80)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));

        let view = svc.create(draft(fx.host.id, 80)).await.unwrap();
        assert!(view.listing.is_active);
        assert!(view.is_available());
        assert_eq!(view.rating, RatingSummary::default());
    }

    #[tokio::test]
    async fn create_rejects_bad_fields() {
        let fx = fixture().await;
        let svc = ListingService::new(fx.store.clone(), clock());

        let mut d = draft(fx.host.id, 80);
        d.price_per_night = Decimal::ZERO;
        assert!(matches!(
            svc.create(d).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn deactivate_is_soft() {
        let fx = fixture().await;
        let svc = ListingService::new(fx.store.clone(), clock());

        let view = svc.deactivate(fx.listing.id).await.unwrap();
        assert!(!view.listing.is_active);
        assert!(!view.is_available());
        assert!(svc.get(fx.listing.id).await.is_ok());
    }

    #[tokio::test]
    async fn inactive_host_makes_listing_unavailable() {
        let fx = fixture().await;
        let mut host = fx.host.clone();
        host.is_active = false;
        fx.store.users().update_user(host).await.unwrap();

        let svc = ListingService::new(fx.store.clone(), clock());
        let view = svc.get(fx.listing.id).await.unwrap();
        assert!(view.listing.is_active);
        assert!(!view.is_available());
    }

    #[tokio::test]
    async fn list_filters_by_city_and_type() {
        let fx = fixture().await;
        let svc = ListingService::new(fx.store.clone(), clock());
        let mut other = draft(fx.host.id, 200);
        other.city = "Lisbon".into();
        other.property_type = PropertyType::Villa;
        svc.create(other).await.unwrap();

        let filter = ListingFilter {
            city: Some("lisbon".into()),
            ..Default::default()
        };
        let page = svc.list(filter, PaginationParams::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].listing.property_type, PropertyType::Villa);

        let filter = ListingFilter {
            property_type: Some(PropertyType::Apartment),
            ..Default::default()
        };
        let page = svc.list(filter, PaginationParams::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn rating_reflects_all_reviews() {
        let fx = fixture().await;
        let svc = ListingService::new(fx.store.clone(), clock());
        let now = Utc::now();

        for rating in [5, 3, 4] {
            let booking = Booking {
                id: 0,
                listing_id: fx.listing.id,
                guest_id: fx.guest.id,
                check_in: now.date_naive(),
                check_out: now.date_naive() + chrono::Duration::days(1),
                num_guests: 1,
                status: BookingStatus::Completed,
                price_per_night: Decimal::from(100),
                subtotal: Decimal::from(100),
                total_price: Decimal::from(100),
                created_at: now,
                updated_at: now,
            };
            let booking = fx.store.bookings().save(booking).await.unwrap();
            let review = Review {
                id: 0,
                listing_id: fx.listing.id,
                booking_id: booking.id,
                reviewer_id: fx.guest.id,
                overall_rating: rating,
                comment: String::new(),
                is_verified: true,
                host_response: None,
                host_responded_at: None,
                created_at: now,
                updated_at: now,
            };
            fx.store.reviews().save(review).await.unwrap();
        }

        let summary = svc.rating(fx.listing.id).await.unwrap();
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.review_count, 3);
        assert_eq!(svc.get(fx.listing.id).await.unwrap().rating, summary);
    }
}
