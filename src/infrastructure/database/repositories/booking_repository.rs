//! SeaORM implementation of BookingRepository

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{cents, db_err, fetch_page};
use crate::domain::booking::{Booking, BookingFilter, BookingRepository, BookingStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, listing, review, user};
use crate::shared::{from_minor_units, PaginatedResult, PaginationParams};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    Ok(Booking {
        id: m.id,
        listing_id: m.listing_id,
        guest_id: m.guest_id,
        check_in: m.check_in,
        check_out: m.check_out,
        num_guests: m.num_guests,
        status: BookingStatus::from_str(&m.status)?,
        price_per_night: from_minor_units(m.price_per_night),
        subtotal: from_minor_units(m.subtotal),
        total_price: from_minor_units(m.total_price),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

fn domain_to_active(b: Booking) -> DomainResult<booking::ActiveModel> {
    Ok(booking::ActiveModel {
        id: if b.id == 0 { NotSet } else { Set(b.id) },
        listing_id: Set(b.listing_id),
        guest_id: Set(b.guest_id),
        check_in: Set(b.check_in),
        check_out: Set(b.check_out),
        num_guests: Set(b.num_guests),
        status: Set(b.status.as_str().to_string()),
        price_per_night: Set(cents(b.price_per_night)?),
        subtotal: Set(cents(b.subtotal)?),
        total_price: Set(cents(b.total_price)?),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    })
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, b: Booking) -> DomainResult<Booking> {
        debug!(
            "Saving booking: listing {} guest {} {}..{}",
            b.listing_id, b.guest_id, b.check_in, b.check_out
        );

        let listing = listing::Entity::find_by_id(b.listing_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if listing.is_none() {
            return Err(DomainError::not_found("Listing", b.listing_id));
        }
        let guest = user::Entity::find_by_id(b.guest_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if guest.is_none() {
            return Err(DomainError::not_found("User", b.guest_id));
        }

        let mut b = b;
        b.id = 0;
        let saved = domain_to_active(b)?
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, b: Booking) -> DomainResult<()> {
        debug!("Updating booking {} -> {}", b.id, b.status);

        let existing = booking::Entity::find_by_id(b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Booking", b.id));
        }

        domain_to_active(b)?
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_page(
        &self,
        filter: BookingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let mut query = booking::Entity::find();

        if let Some(guest_id) = filter.guest_id {
            query = query.filter(booking::Column::GuestId.eq(guest_id));
        }
        if let Some(listing_id) = filter.listing_id {
            query = query.filter(booking::Column::ListingId.eq(listing_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }

        let query = query
            .order_by_desc(booking::Column::CreatedAt)
            .order_by_desc(booking::Column::Id);
        let (models, total) = fetch_page(&self.db, query, page).await.map_err(db_err)?;

        Ok(PaginatedResult::new(
            models_to_domain(models)?,
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_overlapping(
        &self,
        listing_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::ListingId.eq(listing_id))
            .filter(booking::Column::Status.ne(BookingStatus::Cancelled.as_str()))
            .filter(booking::Column::CheckIn.lt(check_out))
            .filter(booking::Column::CheckOut.gt(check_in))
            .order_by_desc(booking::Column::CreatedAt)
            .order_by_desc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        review::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let res = booking::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        debug!("Deleted {} bookings", res.rows_affected);
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::listing::{ListingRepository, PropertyType};
    use crate::domain::user::UserRepository;
    use crate::domain::{Listing, User};
    use crate::infrastructure::database::repositories::listing_repository::SeaOrmListingRepository;
    use crate::infrastructure::database::repositories::test_db;
    use crate::infrastructure::database::repositories::user_repository::SeaOrmUserRepository;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap() + Duration::days(n)
    }

    /// Database with one user acting as host and guest, and one listing.
    async fn seeded() -> (SeaOrmBookingRepository, i32, i32) {
        let db = test_db().await;
        let now = Utc::now();
        let user = SeaOrmUserRepository::new(db.clone())
            .create_user(User {
                id: 0,
                username: "erin".into(),
                email: "erin@example.com".into(),
                first_name: "Erin".into(),
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
                host_id: user.id,
                title: "Cabin".into(),
                description: String::new(),
                property_type: PropertyType::Cabin,
                address: "Forest road".into(),
                city: "Bergen".into(),
                country: "Norway".into(),
                has_air_conditioning: false,
                has_kitchen: true,
                bedrooms: 1,
                bathrooms: 1,
                price_per_night: Decimal::from(120),
                image_url: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        (SeaOrmBookingRepository::new(db), listing.id, user.id)
    }

    fn booking(listing_id: i32, guest_id: i32, from: i64, to: i64, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: 0,
            listing_id,
            guest_id,
            check_in: day(from),
            check_out: day(to),
            num_guests: 2,
            status,
            price_per_night: Decimal::from(120),
            subtotal: Decimal::from(120 * (to - from)),
            total_price: Decimal::from(120 * (to - from)),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn overlap_query_skips_cancelled_and_touching_stays() {
        let (repo, listing_id, guest_id) = seeded().await;
        let kept = repo
            .save(booking(listing_id, guest_id, 0, 3, BookingStatus::Confirmed))
            .await
            .unwrap();
        repo.save(booking(listing_id, guest_id, 1, 2, BookingStatus::Cancelled))
            .await
            .unwrap();

        let hits = repo.find_overlapping(listing_id, day(2), day(5)).await.unwrap();
        assert_eq!(hits.iter().map(|b| b.id).collect::<Vec<_>>(), vec![kept.id]);

        // check-out day is free for the next arrival
        let none = repo.find_overlapping(listing_id, day(3), day(5)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn status_update_and_filter() {
        let (repo, listing_id, guest_id) = seeded().await;
        let mut b = repo
            .save(booking(listing_id, guest_id, 0, 2, BookingStatus::Pending))
            .await
            .unwrap();
        b.set_status(BookingStatus::Confirmed, Utc::now());
        repo.update(b.clone()).await.unwrap();

        let filter = BookingFilter {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        };
        let page = repo
            .find_page(filter, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, b.id);
        assert_eq!(page.items[0].total_price, Decimal::from(240));
    }

    #[tokio::test]
    async fn save_requires_existing_listing() {
        let (repo, _, guest_id) = seeded().await;
        let err = repo
            .save(booking(999, guest_id, 0, 2, BookingStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Listing", .. }));
    }
}
