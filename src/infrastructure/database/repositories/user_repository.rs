//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{db_err, fetch_page, is_unique_violation};
use crate::domain::user::{User, UserFilter, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, listing, review, user};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        first_name: m.first_name,
        last_name: m.last_name,
        password_hash: m.password_hash,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn conflict_or_db(e: sea_orm::DbErr, username: &str, email: &str) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::Conflict(format!("User '{}' or email '{}'", username, email))
    } else {
        db_err(e)
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, u: User) -> DomainResult<User> {
        debug!("Creating user: {}", u.username);

        let model = user::ActiveModel {
            id: NotSet,
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            password_hash: Set(u.password_hash),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };
        let saved = model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_or_db(e, &u.username, &u.email))?;
        Ok(model_to_domain(saved))
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::Username))))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::Email))))
                            .like(pattern),
                    ),
            );
        }
        if let Some(active) = filter.is_active {
            query = query.filter(user::Column::IsActive.eq(active));
        }

        let query = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id);
        let (models, total) = fetch_page(&self.db, query, page).await.map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn get_users_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_user(&self, u: User) -> DomainResult<()> {
        debug!("Updating user: {}", u.id);

        let existing = user::Entity::find_by_id(u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("User", u.id));
        }

        let model = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            password_hash: Set(u.password_hash),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| conflict_or_db(e, &u.username, &u.email))?;
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting user {} with dependent rows", id);

        let txn = self.db.begin().await.map_err(db_err)?;

        if user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(DomainError::not_found("User", id));
        }

        let listing_ids: Vec<i32> = listing::Entity::find()
            .filter(listing::Column::HostId.eq(id))
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|l| l.id)
            .collect();

        let booking_ids: Vec<i32> = booking::Entity::find()
            .filter(
                Condition::any()
                    .add(booking::Column::GuestId.eq(id))
                    .add(booking::Column::ListingId.is_in(listing_ids.clone())),
            )
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|b| b.id)
            .collect();

        review::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(review::Column::ReviewerId.eq(id))
                    .add(review::Column::BookingId.is_in(booking_ids.clone()))
                    .add(review::Column::ListingId.is_in(listing_ids.clone())),
            )
            .exec(&txn)
            .await
            .map_err(db_err)?;
        booking::Entity::delete_many()
            .filter(booking::Column::Id.is_in(booking_ids))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        listing::Entity::delete_many()
            .filter(listing::Column::Id.is_in(listing_ids))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::infrastructure::database::repositories::test_db;

    fn user(name: &str) -> User {
        let now = Utc::now();
        User {
            id: 0,
            username: name.into(),
            email: format!("{name}@example.com"),
            first_name: name.into(),
            last_name: "Tester".into(),
            password_hash: "hash".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_reads_back() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        let saved = repo.create_user(user("alice")).await.unwrap();
        assert!(saved.id > 0);

        let by_name = repo.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, saved.id);
        let by_email = repo.get_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(saved.id));
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        repo.create_user(user("bob")).await.unwrap();

        let mut again = user("bob");
        again.email = "other@example.com".into();
        let err = repo.create_user(again).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn search_matches_username_or_email_case_insensitively() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        repo.create_user(user("Carol")).await.unwrap();
        repo.create_user(user("dave")).await.unwrap();

        let filter = UserFilter {
            search: Some("CAR".into()),
            is_active: None,
        };
        let page = repo
            .list_users(filter, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].username, "Carol");
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        let err = repo.delete_user(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
