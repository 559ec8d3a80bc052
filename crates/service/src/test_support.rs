#![cfg(test)]
use sea_orm::DatabaseConnection;

use models::{Car, Condition, Details, Location, Manufacturer};

/// Fresh migrated in-memory database for the current test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}

pub fn impala() -> Car {
    Car::new(
        Condition::Used,
        Details {
            body: Some("sedan".into()),
            model: Some("Impala".into()),
            manufacturer: Some(Manufacturer::new(101, "Chevrolet")),
            number_of_doors: Some(4),
            fuel_type: Some("Gasoline".into()),
            engine: Some("3.6L V6".into()),
            mileage: Some(32280),
            model_year: Some(2018),
            production_year: Some(2018),
            external_color: Some("white".into()),
        },
        Location::new(40.730610, -73.935242),
    )
}
