//! Review use-cases

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::views::{review_view, review_views, ReviewView};
use crate::domain::review::{check_eligibility, ReviewFilter, ReviewSubmission};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Review};
use crate::shared::{PaginatedResult, PaginationParams, SharedClock};

pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    async fn load(&self, id: i32) -> DomainResult<Review> {
        self.repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", id))
    }

    /// Write a review for a completed booking. The listing is taken from the booking.
    pub async fn create(&self, submission: ReviewSubmission) -> DomainResult<ReviewView> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(submission.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", submission.booking_id))?;
        if self.repos.users().get_user_by_id(submission.reviewer_id).await?.is_none() {
            return Err(DomainError::not_found("User", submission.reviewer_id));
        }

        let already_reviewed = self.repos.reviews().exists_for_booking(booking.id).await?;
        if let Err(e) = check_eligibility(&booking, &submission, already_reviewed) {
            warn!(
                booking_id = booking.id,
                reviewer_id = submission.reviewer_id,
                reason = e.reason(),
                "Review rejected"
            );
            return Err(e.into());
        }

        let review = Review::for_booking(&booking, submission, self.clock.now());
        let review = self.repos.reviews().save(review).await?;

        metrics::counter!("reviews_created_total").increment(1);
        info!(
            review_id = review.id,
            booking_id = review.booking_id,
            listing_id = review.listing_id,
            rating = review.overall_rating,
            "Review created"
        );
        review_view(self.repos.as_ref(), review).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<ReviewView> {
        let review = self.load(id).await?;
        review_view(self.repos.as_ref(), review).await
    }

    pub async fn list(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<ReviewView>> {
        let mut result = self.repos.reviews().find_page(filter, page).await?;
        let items = review_views(self.repos.as_ref(), std::mem::take(&mut result.items)).await?;
        Ok(result.with_items(items))
    }

    /// Set the host's reply and stamp the reply time.
    pub async fn respond(&self, id: i32, response: String) -> DomainResult<ReviewView> {
        if response.trim().is_empty() {
            return Err(DomainError::Validation(
                "Host response cannot be empty.".into(),
            ));
        }
        let mut review = self.load(id).await?;
        review.respond(response, self.clock.now());
        self.repos.reviews().update(review.clone()).await?;

        info!(review_id = id, listing_id = review.listing_id, "Host responded to review");
        review_view(self.repos.as_ref(), review).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{clock, day, fixture, user, Fixture};
    use crate::domain::booking::BookingRequest;
    use crate::domain::review::ReviewError;
    use crate::domain::{Booking, BookingStatus};
    use crate::application::BookingService;

    async fn booking(fx: &Fixture, status: BookingStatus) -> Booking {
        let bookings = BookingService::new(fx.store.clone(), clock());
        let view = bookings
            .create(BookingRequest {
                listing_id: fx.listing.id,
                guest_id: fx.guest.id,
                check_in: day(5),
                check_out: day(8),
                num_guests: 1,
            })
            .await
            .unwrap();
        bookings.set_status(view.booking.id, status).await.unwrap().booking
    }

    fn submission(booking: &Booking, reviewer_id: i32, rating: i32) -> ReviewSubmission {
        ReviewSubmission {
            booking_id: booking.id,
            reviewer_id,
            rating,
            comment: "Spotless and central".into(),
        }
    }

    #[tokio::test]
    async fn guest_reviews_completed_stay() {
        let fx = fixture().await;
        let svc = ReviewService::new(fx.store.clone(), clock());
        let b = booking(&fx, BookingStatus::Completed).await;

        let view = svc.create(submission(&b, fx.guest.id, 5)).await.unwrap();
        assert!(view.review.is_verified);
        assert_eq!(view.review.listing_id, fx.listing.id);
        assert_eq!(view.reviewer.username, "guest1");
        assert_eq!(view.listing_title, "Canal loft");
    }

    #[tokio::test]
    async fn second_review_is_duplicate() {
        let fx = fixture().await;
        let svc = ReviewService::new(fx.store.clone(), clock());
        let b = booking(&fx, BookingStatus::Completed).await;

        svc.create(submission(&b, fx.guest.id, 5)).await.unwrap();
        let err = svc.create(submission(&b, fx.guest.id, 4)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Review(ReviewError::DuplicateReview { .. })
        ));
    }

    #[tokio::test]
    async fn gate_errors_surface() {
        let fx = fixture().await;
        let svc = ReviewService::new(fx.store.clone(), clock());
        let stranger = fx.store.users().create_user(user("stranger")).await.unwrap();

        let pending = booking(&fx, BookingStatus::Confirmed).await;
        assert!(matches!(
            svc.create(submission(&pending, fx.guest.id, 5)).await.unwrap_err(),
            DomainError::Review(ReviewError::BookingNotCompleted)
        ));

        let done = booking(&fx, BookingStatus::Completed).await;
        assert!(matches!(
            svc.create(submission(&done, stranger.id, 5)).await.unwrap_err(),
            DomainError::Review(ReviewError::WrongReviewer)
        ));
        assert!(matches!(
            svc.create(submission(&done, fx.guest.id, 6)).await.unwrap_err(),
            DomainError::Review(ReviewError::RatingRange)
        ));
    }

    #[tokio::test]
    async fn respond_stamps_time() {
        let fx = fixture().await;
        let svc = ReviewService::new(fx.store.clone(), clock());
        let b = booking(&fx, BookingStatus::Completed).await;
        let id = svc.create(submission(&b, fx.guest.id, 4)).await.unwrap().review.id;

        let view = svc.respond(id, "Thanks for staying!".into()).await.unwrap();
        assert!(view.review.has_host_responded());
        assert_eq!(view.review.host_responded_at, Some(clock().now()));

        assert!(matches!(
            svc.respond(id, "   ".into()).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn list_by_listing() {
        let fx = fixture().await;
        let svc = ReviewService::new(fx.store.clone(), clock());
        let b = booking(&fx, BookingStatus::Completed).await;
        svc.create(submission(&b, fx.guest.id, 4)).await.unwrap();

        let page = svc
            .list(ReviewFilter::for_listing(fx.listing.id), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = svc
            .list(ReviewFilter::for_listing(fx.listing.id + 1), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
