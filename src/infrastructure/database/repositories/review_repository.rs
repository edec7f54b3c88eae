//! SeaORM implementation of ReviewRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use super::{db_err, fetch_page, is_unique_violation};
use crate::domain::review::{Review, ReviewError, ReviewFilter, ReviewRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::review;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: review::Model) -> Review {
    Review {
        id: m.id,
        listing_id: m.listing_id,
        booking_id: m.booking_id,
        reviewer_id: m.reviewer_id,
        overall_rating: m.overall_rating,
        comment: m.comment,
        is_verified: m.is_verified,
        host_response: m.host_response,
        host_responded_at: m.host_responded_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: Review) -> review::ActiveModel {
    review::ActiveModel {
        id: if r.id == 0 { NotSet } else { Set(r.id) },
        listing_id: Set(r.listing_id),
        booking_id: Set(r.booking_id),
        reviewer_id: Set(r.reviewer_id),
        overall_rating: Set(r.overall_rating),
        comment: Set(r.comment),
        is_verified: Set(r.is_verified),
        host_response: Set(r.host_response),
        host_responded_at: Set(r.host_responded_at),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

// ── ReviewRepository impl ───────────────────────────────────────

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn save(&self, r: Review) -> DomainResult<Review> {
        debug!("Saving review for booking {}", r.booking_id);

        let booking_id = r.booking_id;
        let mut r = r;
        r.id = 0;
        let saved = domain_to_active(r)
            .insert(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::from(ReviewError::DuplicateReview { booking_id })
                } else {
                    db_err(e)
                }
            })?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Review>> {
        let model = review::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, r: Review) -> DomainResult<()> {
        debug!("Updating review: {}", r.id);

        let existing = review::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Review", r.id));
        }

        domain_to_active(r).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_page(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Review>> {
        let mut query = review::Entity::find();

        if let Some(listing_id) = filter.listing_id {
            query = query.filter(review::Column::ListingId.eq(listing_id));
        }
        if let Some(reviewer_id) = filter.reviewer_id {
            query = query.filter(review::Column::ReviewerId.eq(reviewer_id));
        }

        let query = query
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id);
        let (models, total) = fetch_page(&self.db, query, page).await.map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn exists_for_booking(&self, booking_id: i32) -> DomainResult<bool> {
        let count = review::Entity::find()
            .filter(review::Column::BookingId.eq(booking_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn ratings_for_listings(
        &self,
        listing_ids: &[i32],
    ) -> DomainResult<HashMap<i32, Vec<i32>>> {
        if listing_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i32)> = review::Entity::find()
            .select_only()
            .column(review::Column::ListingId)
            .column(review::Column::OverallRating)
            .filter(review::Column::ListingId.is_in(listing_ids.to_vec()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut out: HashMap<i32, Vec<i32>> = HashMap::new();
        for (listing_id, rating) in rows {
            out.entry(listing_id).or_default().push(rating);
        }
        Ok(out)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let res = review::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        debug!("Deleted {} reviews", res.rows_affected);
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
    use crate::domain::listing::{ListingRepository, PropertyType};
    use crate::domain::user::UserRepository;
    use crate::domain::{Listing, User};
    use crate::infrastructure::database::repositories::booking_repository::SeaOrmBookingRepository;
    use crate::infrastructure::database::repositories::listing_repository::SeaOrmListingRepository;
    use crate::infrastructure::database::repositories::test_db;
    use crate::infrastructure::database::repositories::user_repository::SeaOrmUserRepository;

    /// One completed booking; returns (repo, listing id, booking id, guest id).
    async fn seeded() -> (SeaOrmReviewRepository, i32, i32, i32) {
        let db = test_db().await;
        let now = Utc::now();
        let guest = SeaOrmUserRepository::new(db.clone())
            .create_user(User {
                id: 0,
                username: "fay".into(),
                email: "fay@example.com".into(),
                first_name: "Fay".into(),
                last_name: String::new(),
                password_hash: "hash".into(),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let listing = SeaOrmListingRepository::new(db.clone())
            .save(Listing {
                id: 0,
                host_id: guest.id,
                title: "Villa".into(),
                description: String::new(),
                property_type: PropertyType::Villa,
                address: "Hill 1".into(),
                city: "Split".into(),
                country: "Croatia".into(),
                has_air_conditioning: true,
                has_kitchen: true,
                bedrooms: 3,
                bathrooms: 2,
                price_per_night: Decimal::from(300),
                image_url: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let check_in = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let booking = SeaOrmBookingRepository::new(db.clone())
            .save(Booking {
                id: 0,
                listing_id: listing.id,
                guest_id: guest.id,
                check_in,
                check_out: check_in + Duration::days(2),
                num_guests: 2,
                status: BookingStatus::Completed,
                price_per_night: Decimal::from(300),
                subtotal: Decimal::from(600),
                total_price: Decimal::from(600),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        (SeaOrmReviewRepository::new(db), listing.id, booking.id, guest.id)
    }

    fn review(listing_id: i32, booking_id: i32, reviewer_id: i32, rating: i32) -> Review {
        let now = Utc::now();
        Review {
            id: 0,
            listing_id,
            booking_id,
            reviewer_id,
            overall_rating: rating,
            comment: "Sea view".into(),
            is_verified: true,
            host_response: None,
            host_responded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn second_review_for_booking_is_duplicate() {
        let (repo, listing_id, booking_id, guest_id) = seeded().await;
        repo.save(review(listing_id, booking_id, guest_id, 5))
            .await
            .unwrap();
        assert!(repo.exists_for_booking(booking_id).await.unwrap());

        let err = repo
            .save(review(listing_id, booking_id, guest_id, 3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Review(ReviewError::DuplicateReview { .. })
        ));
    }

    #[tokio::test]
    async fn ratings_grouped_by_listing() {
        let (repo, listing_id, booking_id, guest_id) = seeded().await;
        repo.save(review(listing_id, booking_id, guest_id, 4))
            .await
            .unwrap();

        let ratings = repo
            .ratings_for_listings(&[listing_id, listing_id + 100])
            .await
            .unwrap();
        assert_eq!(ratings.get(&listing_id), Some(&vec![4]));
        assert!(!ratings.contains_key(&(listing_id + 100)));
    }

    #[tokio::test]
    async fn host_response_is_persisted() {
        let (repo, listing_id, booking_id, guest_id) = seeded().await;
        let mut saved = repo
            .save(review(listing_id, booking_id, guest_id, 5))
            .await
            .unwrap();
        saved.respond("Come back soon", Utc::now());
        repo.update(saved.clone()).await.unwrap();

        let loaded = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.host_response.as_deref(), Some("Come back soon"));
        assert!(loaded.host_responded_at.is_some());
    }
}
