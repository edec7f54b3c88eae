//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod listing_repository;
pub mod repository_provider;
pub mod review_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use rust_decimal::Decimal;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select, SqlErr,
};

use crate::domain::{DomainError, DomainResult};
use crate::shared::{to_minor_units, PaginationParams};

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn cents(amount: Decimal) -> DomainResult<i64> {
    to_minor_units(amount)
        .ok_or_else(|| DomainError::Validation(format!("Amount out of range: {amount}")))
}

/// Count the rows matched by `query`, then load one page of them.
async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: PaginationParams,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let total = query.clone().count(db).await?;
    let models = query
        .offset(page.offset())
        .limit(page.limit as u64)
        .all(db)
        .await?;
    Ok((models, total))
}

/// Fresh SQLite database with the schema applied, for repository tests.
#[cfg(test)]
pub(crate) async fn test_db() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    crate::infrastructure::database::migrator::Migrator::up(&db, None)
        .await
        .expect("migrate");
    db
}
