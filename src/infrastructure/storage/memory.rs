//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

use crate::domain::booking::{Booking, BookingFilter, BookingRepository, BookingStatus};
use crate::domain::listing::{Listing, ListingFilter, ListingRepository};
use crate::domain::review::{Review, ReviewError, ReviewFilter, ReviewRepository};
use crate::domain::user::{User, UserFilter, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

/// In-memory storage for development and testing
///
/// Mirrors the database schema rules: unique usernames, emails and
/// review-per-booking, and cascading deletes from users.
pub struct InMemoryStorage {
    users: DashMap<i32, User>,
    listings: DashMap<i32, Listing>,
    bookings: DashMap<i32, Booking>,
    reviews: DashMap<i32, Review>,
    user_counter: AtomicI32,
    listing_counter: AtomicI32,
    booking_counter: AtomicI32,
    review_counter: AtomicI32,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            listings: DashMap::new(),
            bookings: DashMap::new(),
            reviews: DashMap::new(),
            user_counter: AtomicI32::new(1),
            listing_counter: AtomicI32::new(1),
            booking_counter: AtomicI32::new(1),
            review_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn listings(&self) -> &dyn ListingRepository {
        self
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        self
    }
}

/// Collect matching values, newest first (created_at desc, then id desc).
fn newest_first<T: Clone>(
    map: &DashMap<i32, T>,
    keep: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i32),
) -> Vec<T> {
    let mut items: Vec<T> = map
        .iter()
        .filter(|e| keep(e.value()))
        .map(|e| e.value().clone())
        .collect();
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

// ── Users ──────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn create_user(&self, mut user: User) -> DomainResult<User> {
        let taken = self.users.iter().any(|u| {
            u.username == user.username || u.email == user.email
        });
        if taken {
            return Err(DomainError::Conflict(format!(
                "User '{}' or email '{}'",
                user.username, user.email
            )));
        }
        user.id = self.user_counter.fetch_add(1, Ordering::SeqCst);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>> {
        let all = newest_first(&self.users, |u| filter.matches(u), |u| (u.created_at, u.id));
        Ok(PaginatedResult::from_vec(all, page))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn get_users_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        let clash = self.users.iter().any(|u| {
            u.id != user.id && u.email == user.email
        });
        if clash {
            return Err(DomainError::Conflict(format!("Email '{}'", user.email)));
        }
        match self.users.get_mut(&user.id) {
            Some(mut existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(DomainError::not_found("User", user.id)),
        }
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("User", id))?;

        // Cascade: listings hosted, then bookings made or on those listings,
        // then reviews written or tied to removed bookings.
        let listing_ids: Vec<i32> = self
            .listings
            .iter()
            .filter(|l| l.host_id == id)
            .map(|l| l.id)
            .collect();
        for lid in &listing_ids {
            self.listings.remove(lid);
        }

        let booking_ids: Vec<i32> = self
            .bookings
            .iter()
            .filter(|b| b.guest_id == id || listing_ids.contains(&b.listing_id))
            .map(|b| b.id)
            .collect();
        for bid in &booking_ids {
            self.bookings.remove(bid);
        }

        self.reviews.retain(|_, r| {
            r.reviewer_id != id
                && !booking_ids.contains(&r.booking_id)
                && !listing_ids.contains(&r.listing_id)
        });
        Ok(())
    }
}

// ── Listings ───────────────────────────────────────────────────

#[async_trait]
impl ListingRepository for InMemoryStorage {
    async fn save(&self, mut listing: Listing) -> DomainResult<Listing> {
        if !self.users.contains_key(&listing.host_id) {
            return Err(DomainError::not_found("User", listing.host_id));
        }
        listing.id = self.listing_counter.fetch_add(1, Ordering::SeqCst);
        self.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>> {
        Ok(self.listings.get(&id).map(|l| l.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Listing>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.listings.get(id).map(|l| l.clone()))
            .collect())
    }

    async fn update(&self, listing: Listing) -> DomainResult<()> {
        match self.listings.get_mut(&listing.id) {
            Some(mut existing) => {
                *existing = listing;
                Ok(())
            }
            None => Err(DomainError::not_found("Listing", listing.id)),
        }
    }

    async fn find_page(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Listing>> {
        let all = newest_first(&self.listings, |l| filter.matches(l), |l| (l.created_at, l.id));
        Ok(PaginatedResult::from_vec(all, page))
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let n = self.listings.len() as u64;
        self.listings.clear();
        self.bookings.clear();
        self.reviews.clear();
        Ok(n)
    }
}

// ── Bookings ───────────────────────────────────────────────────

#[async_trait]
impl BookingRepository for InMemoryStorage {
    async fn save(&self, mut booking: Booking) -> DomainResult<Booking> {
        if !self.listings.contains_key(&booking.listing_id) {
            return Err(DomainError::not_found("Listing", booking.listing_id));
        }
        if !self.users.contains_key(&booking.guest_id) {
            return Err(DomainError::not_found("User", booking.guest_id));
        }
        booking.id = self.booking_counter.fetch_add(1, Ordering::SeqCst);
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        match self.bookings.get_mut(&booking.id) {
            Some(mut existing) => {
                *existing = booking;
                Ok(())
            }
            None => Err(DomainError::not_found("Booking", booking.id)),
        }
    }

    async fn find_page(
        &self,
        filter: BookingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let all = newest_first(&self.bookings, |b| filter.matches(b), |b| (b.created_at, b.id));
        Ok(PaginatedResult::from_vec(all, page))
    }

    async fn find_overlapping(
        &self,
        listing_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        Ok(newest_first(
            &self.bookings,
            |b| {
                b.listing_id == listing_id
                    && b.status != BookingStatus::Cancelled
                    && b.overlaps(check_in, check_out)
            },
            |b| (b.created_at, b.id),
        ))
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let n = self.bookings.len() as u64;
        self.bookings.clear();
        self.reviews.clear();
        Ok(n)
    }
}

// ── Reviews ────────────────────────────────────────────────────

#[async_trait]
impl ReviewRepository for InMemoryStorage {
    async fn save(&self, mut review: Review) -> DomainResult<Review> {
        if self.reviews.iter().any(|r| r.booking_id == review.booking_id) {
            return Err(ReviewError::DuplicateReview {
                booking_id: review.booking_id,
            }
            .into());
        }
        review.id = self.review_counter.fetch_add(1, Ordering::SeqCst);
        self.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Review>> {
        Ok(self.reviews.get(&id).map(|r| r.clone()))
    }

    async fn update(&self, review: Review) -> DomainResult<()> {
        match self.reviews.get_mut(&review.id) {
            Some(mut existing) => {
                *existing = review;
                Ok(())
            }
            None => Err(DomainError::not_found("Review", review.id)),
        }
    }

    async fn find_page(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Review>> {
        let all = newest_first(&self.reviews, |r| filter.matches(r), |r| (r.created_at, r.id));
        Ok(PaginatedResult::from_vec(all, page))
    }

    async fn exists_for_booking(&self, booking_id: i32) -> DomainResult<bool> {
        Ok(self.reviews.iter().any(|r| r.booking_id == booking_id))
    }

    async fn ratings_for_listings(
        &self,
        listing_ids: &[i32],
    ) -> DomainResult<HashMap<i32, Vec<i32>>> {
        let mut out: HashMap<i32, Vec<i32>> = HashMap::new();
        for r in self.reviews.iter() {
            if listing_ids.contains(&r.listing_id) {
                out.entry(r.listing_id).or_default().push(r.overall_rating);
            }
        }
        Ok(out)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let n = self.reviews.len() as u64;
        self.reviews.clear();
        Ok(n)
    }
}
