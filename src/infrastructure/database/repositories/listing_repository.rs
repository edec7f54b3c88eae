//! SeaORM implementation of ListingRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{cents, db_err, fetch_page};
use crate::domain::listing::{Listing, ListingFilter, ListingRepository, PropertyType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, listing, review, user};
use crate::shared::{from_minor_units, PaginatedResult, PaginationParams};

pub struct SeaOrmListingRepository {
    db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_type_to_domain(t: listing::PropertyType) -> PropertyType {
    match t {
        listing::PropertyType::Apartment => PropertyType::Apartment,
        listing::PropertyType::House => PropertyType::House,
        listing::PropertyType::Condo => PropertyType::Condo,
        listing::PropertyType::Cabin => PropertyType::Cabin,
        listing::PropertyType::Villa => PropertyType::Villa,
        listing::PropertyType::Other => PropertyType::Other,
    }
}

fn domain_type_to_entity(t: PropertyType) -> listing::PropertyType {
    match t {
        PropertyType::Apartment => listing::PropertyType::Apartment,
        PropertyType::House => listing::PropertyType::House,
        PropertyType::Condo => listing::PropertyType::Condo,
        PropertyType::Cabin => listing::PropertyType::Cabin,
        PropertyType::Villa => listing::PropertyType::Villa,
        PropertyType::Other => listing::PropertyType::Other,
    }
}

fn model_to_domain(m: listing::Model) -> Listing {
    Listing {
        id: m.id,
        host_id: m.host_id,
        title: m.title,
        description: m.description,
        property_type: entity_type_to_domain(m.property_type),
        address: m.address,
        city: m.city,
        country: m.country,
        has_air_conditioning: m.has_air_conditioning,
        has_kitchen: m.has_kitchen,
        bedrooms: m.bedrooms,
        bathrooms: m.bathrooms,
        price_per_night: from_minor_units(m.price_per_night),
        image_url: m.image_url,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(l: Listing) -> DomainResult<listing::ActiveModel> {
    Ok(listing::ActiveModel {
        id: if l.id == 0 { NotSet } else { Set(l.id) },
        host_id: Set(l.host_id),
        title: Set(l.title),
        description: Set(l.description),
        property_type: Set(domain_type_to_entity(l.property_type)),
        address: Set(l.address),
        city: Set(l.city),
        country: Set(l.country),
        has_air_conditioning: Set(l.has_air_conditioning),
        has_kitchen: Set(l.has_kitchen),
        bedrooms: Set(l.bedrooms),
        bathrooms: Set(l.bathrooms),
        price_per_night: Set(cents(l.price_per_night)?),
        image_url: Set(l.image_url),
        is_active: Set(l.is_active),
        created_at: Set(l.created_at),
        updated_at: Set(l.updated_at),
    })
}

// ── ListingRepository impl ──────────────────────────────────────

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn save(&self, l: Listing) -> DomainResult<Listing> {
        debug!("Saving listing '{}' for host {}", l.title, l.host_id);

        let host = user::Entity::find_by_id(l.host_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if host.is_none() {
            return Err(DomainError::not_found("User", l.host_id));
        }

        let mut l = l;
        l.id = 0;
        let saved = domain_to_active(l)?
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>> {
        let model = listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Listing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = listing::Entity::find()
            .filter(listing::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, l: Listing) -> DomainResult<()> {
        debug!("Updating listing: {}", l.id);

        let existing = listing::Entity::find_by_id(l.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Listing", l.id));
        }

        domain_to_active(l)?
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_page(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Listing>> {
        let mut query = listing::Entity::find();

        if let Some(city) = filter.city.as_deref() {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((listing::Entity, listing::Column::City))))
                    .eq(city.to_lowercase()),
            );
        }
        if let Some(t) = filter.property_type {
            query = query.filter(listing::Column::PropertyType.eq(domain_type_to_entity(t)));
        }
        if let Some(host_id) = filter.host_id {
            query = query.filter(listing::Column::HostId.eq(host_id));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(listing::Column::IsActive.eq(active));
        }

        let query = query
            .order_by_desc(listing::Column::CreatedAt)
            .order_by_desc(listing::Column::Id);
        let (models, total) = fetch_page(&self.db, query, page).await.map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        review::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        booking::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let res = listing::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        debug!("Deleted {} listings", res.rows_affected);
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::user::UserRepository;
    use crate::infrastructure::database::repositories::test_db;
    use crate::infrastructure::database::repositories::user_repository::SeaOrmUserRepository;

    async fn host(db: &DatabaseConnection) -> i32 {
        let now = Utc::now();
        SeaOrmUserRepository::new(db.clone())
            .create_user(crate::domain::User {
                id: 0,
                username: "host".into(),
                email: "host@example.com".into(),
                first_name: "Hal".into(),
                last_name: "Host".into(),
                password_hash: "hash".into(),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
            .id
    }

    fn listing(host_id: i32, city: &str, price: Decimal) -> Listing {
        let now = Utc::now();
        Listing {
            id: 0,
            host_id,
            title: format!("Flat in {city}"),
            description: String::new(),
            property_type: PropertyType::Condo,
            address: "2 Main St".into(),
            city: city.into(),
            country: "Portugal".into(),
            has_air_conditioning: true,
            has_kitchen: false,
            bedrooms: 2,
            bathrooms: 1,
            price_per_night: price,
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn price_survives_cents_round_trip() {
        let db = test_db().await;
        let host_id = host(&db).await;
        let repo = SeaOrmListingRepository::new(db);

        let saved = repo
            .save(listing(host_id, "Lisbon", Decimal::new(12_550, 2)))
            .await
            .unwrap();
        let loaded = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_per_night, Decimal::new(12_550, 2));
        assert_eq!(loaded.property_type, PropertyType::Condo);
    }

    #[tokio::test]
    async fn price_too_large_for_cents_is_rejected() {
        let db = test_db().await;
        let host_id = host(&db).await;
        let repo = SeaOrmListingRepository::new(db);

        let err = repo
            .save(listing(host_id, "Lisbon", Decimal::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn save_with_unknown_host_is_not_found() {
        let repo = SeaOrmListingRepository::new(test_db().await);
        let err = repo
            .save(listing(42, "Porto", Decimal::from(80)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }

    #[tokio::test]
    async fn city_filter_ignores_case() {
        let db = test_db().await;
        let host_id = host(&db).await;
        let repo = SeaOrmListingRepository::new(db);
        repo.save(listing(host_id, "Lisbon", Decimal::from(90)))
            .await
            .unwrap();
        repo.save(listing(host_id, "Porto", Decimal::from(70)))
            .await
            .unwrap();

        let filter = ListingFilter {
            city: Some("LISBON".into()),
            ..Default::default()
        };
        let page = repo
            .find_page(filter, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].city, "Lisbon");
    }

    #[tokio::test]
    async fn newest_listing_comes_first() {
        let db = test_db().await;
        let host_id = host(&db).await;
        let repo = SeaOrmListingRepository::new(db);

        let mut older = listing(host_id, "Lisbon", Decimal::from(90));
        older.created_at = Utc::now() - chrono::Duration::days(1);
        repo.save(older).await.unwrap();
        let newer = repo
            .save(listing(host_id, "Porto", Decimal::from(70)))
            .await
            .unwrap();

        let page = repo
            .find_page(ListingFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].id, newer.id);
    }
}
