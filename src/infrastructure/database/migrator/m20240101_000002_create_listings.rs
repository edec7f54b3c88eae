//! Create listings table
//!
//! Prices are stored in cents. Listings go away with their host.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::HostId).integer().not_null())
                    .col(ColumnDef::new(Listings::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Listings::Description).text().not_null())
                    .col(
                        ColumnDef::new(Listings::PropertyType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Listings::City).string_len(100).not_null())
                    .col(ColumnDef::new(Listings::Country).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Listings::HasAirConditioning)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Listings::HasKitchen)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(Listings::Bathrooms).integer().not_null())
                    .col(
                        ColumnDef::new(Listings::PricePerNight)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::ImageUrl).string())
                    .col(
                        ColumnDef::new(Listings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_host")
                            .from(Listings::Table, Listings::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_city_active")
                    .table(Listings::Table)
                    .col(Listings::City)
                    .col(Listings::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_price")
                    .table(Listings::Table)
                    .col(Listings::PricePerNight)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_created_at")
                    .table(Listings::Table)
                    .col(Listings::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Listings {
    Table,
    Id,
    HostId,
    Title,
    Description,
    PropertyType,
    Address,
    City,
    Country,
    HasAirConditioning,
    HasKitchen,
    Bedrooms,
    Bathrooms,
    PricePerNight,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
