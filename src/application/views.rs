//! Read models joining an aggregate with the rows it references
//!
//! Handlers render these; the services build them in batches so a page of
//! results costs a fixed number of repository calls.

use std::collections::HashMap;

use crate::domain::{
    Booking, DomainError, DomainResult, Listing, RatingSummary, RepositoryProvider, Review, User,
};

/// Listing with its host and rating aggregate
#[derive(Debug, Clone)]
pub struct ListingView {
    pub listing: Listing,
    pub host: User,
    pub rating: RatingSummary,
}

impl ListingView {
    pub fn is_available(&self) -> bool {
        self.listing.is_available(self.host.is_active)
    }
}

/// Booking with its listing and guest
#[derive(Debug, Clone)]
pub struct BookingView {
    pub booking: Booking,
    pub listing: ListingView,
    pub guest: User,
}

/// Review with its author and the title of the reviewed listing
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub review: Review,
    pub reviewer: User,
    pub listing_title: String,
}

fn dedup(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn users_by_id(repos: &dyn RepositoryProvider, ids: Vec<i32>) -> DomainResult<HashMap<i32, User>> {
    let users = repos.users().get_users_by_ids(&dedup(ids)).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn listing_views(
    repos: &dyn RepositoryProvider,
    listings: Vec<Listing>,
) -> DomainResult<Vec<ListingView>> {
    let hosts = users_by_id(repos, listings.iter().map(|l| l.host_id).collect()).await?;
    let listing_ids = dedup(listings.iter().map(|l| l.id).collect());
    let mut ratings = repos.reviews().ratings_for_listings(&listing_ids).await?;

    listings
        .into_iter()
        .map(|listing| {
            let host = hosts
                .get(&listing.host_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("User", listing.host_id))?;
            let rating = RatingSummary::from_ratings(ratings.remove(&listing.id).unwrap_or_default());
            Ok(ListingView {
                listing,
                host,
                rating,
            })
        })
        .collect()
}

pub async fn listing_view(repos: &dyn RepositoryProvider, listing: Listing) -> DomainResult<ListingView> {
    let id = listing.id;
    listing_views(repos, vec![listing])
        .await?
        .pop()
        .ok_or_else(|| DomainError::not_found("Listing", id))
}

pub async fn booking_views(
    repos: &dyn RepositoryProvider,
    bookings: Vec<Booking>,
) -> DomainResult<Vec<BookingView>> {
    let listing_ids = dedup(bookings.iter().map(|b| b.listing_id).collect());
    let listings = repos.listings().find_by_ids(&listing_ids).await?;
    let listings: HashMap<i32, ListingView> = listing_views(repos, listings)
        .await?
        .into_iter()
        .map(|v| (v.listing.id, v))
        .collect();
    let guests = users_by_id(repos, bookings.iter().map(|b| b.guest_id).collect()).await?;

    bookings
        .into_iter()
        .map(|booking| {
            let listing = listings
                .get(&booking.listing_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Listing", booking.listing_id))?;
            let guest = guests
                .get(&booking.guest_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("User", booking.guest_id))?;
            Ok(BookingView {
                booking,
                listing,
                guest,
            })
        })
        .collect()
}

pub async fn booking_view(repos: &dyn RepositoryProvider, booking: Booking) -> DomainResult<BookingView> {
    let id = booking.id;
    booking_views(repos, vec![booking])
        .await?
        .pop()
        .ok_or_else(|| DomainError::not_found("Booking", id))
}

pub async fn review_views(
    repos: &dyn RepositoryProvider,
    reviews: Vec<Review>,
) -> DomainResult<Vec<ReviewView>> {
    let reviewers = users_by_id(repos, reviews.iter().map(|r| r.reviewer_id).collect()).await?;
    let listing_ids = dedup(reviews.iter().map(|r| r.listing_id).collect());
    let titles: HashMap<i32, String> = repos
        .listings()
        .find_by_ids(&listing_ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l.title))
        .collect();

    reviews
        .into_iter()
        .map(|review| {
            let reviewer = reviewers
                .get(&review.reviewer_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("User", review.reviewer_id))?;
            let listing_title = titles.get(&review.listing_id).cloned().unwrap_or_default();
            Ok(ReviewView {
                review,
                reviewer,
                listing_title,
            })
        })
        .collect()
}

pub async fn review_view(repos: &dyn RepositoryProvider, review: Review) -> DomainResult<ReviewView> {
    let id = review.id;
    review_views(repos, vec![review])
        .await?
        .pop()
        .ok_or_else(|| DomainError::not_found("Review", id))
}
