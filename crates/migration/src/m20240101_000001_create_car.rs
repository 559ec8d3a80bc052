//! Create `car` table.
//! Details, manufacturer and coordinates are stored inline; address and price
//! are computed per response and never persisted.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Car::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Car::Condition).string_len(8).not_null())
                    .col(ColumnDef::new(Car::Body).string_len(64).null())
                    .col(ColumnDef::new(Car::Model).string_len(128).null())
                    .col(ColumnDef::new(Car::ManufacturerCode).integer().null())
                    .col(ColumnDef::new(Car::ManufacturerName).string_len(128).null())
                    .col(ColumnDef::new(Car::NumberOfDoors).integer().null())
                    .col(ColumnDef::new(Car::FuelType).string_len(64).null())
                    .col(ColumnDef::new(Car::Engine).string_len(128).null())
                    .col(ColumnDef::new(Car::Mileage).integer().null())
                    .col(ColumnDef::new(Car::ModelYear).integer().null())
                    .col(ColumnDef::new(Car::ProductionYear).integer().null())
                    .col(ColumnDef::new(Car::ExternalColor).string_len(64).null())
                    .col(ColumnDef::new(Car::Lat).double().not_null())
                    .col(ColumnDef::new(Car::Lon).double().not_null())
                    .col(ColumnDef::new(Car::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Car::ModifiedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Car::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Car {
    Table,
    Id,
    Condition,
    Body,
    Model,
    ManufacturerCode,
    ManufacturerName,
    NumberOfDoors,
    FuelType,
    Engine,
    Mileage,
    ModelYear,
    ProductionYear,
    ExternalColor,
    Lat,
    Lon,
    CreatedAt,
    ModifiedAt,
}
