//! Secondary indexes on `car`.
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_car::Car;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_car_manufacturer_code")
                    .table(Car::Table)
                    .col(Car::ManufacturerCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_car_manufacturer_code").table(Car::Table).to_owned())
            .await
    }
}
