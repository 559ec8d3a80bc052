use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::vehicle::{Car, Condition, Details, Location, Manufacturer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub condition: Condition,
    pub body: Option<String>,
    pub model: Option<String>,
    pub manufacturer_code: Option<i32>,
    pub manufacturer_name: Option<String>,
    pub number_of_doors: Option<i32>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub mileage: Option<i32>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub external_color: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Car {
    fn from(m: Model) -> Self {
        let manufacturer = match (m.manufacturer_code, m.manufacturer_name) {
            (Some(code), Some(name)) => Some(Manufacturer { code, name }),
            _ => None,
        };
        Car {
            id: Some(m.id),
            condition: m.condition,
            details: Details {
                body: m.body,
                model: m.model,
                manufacturer,
                number_of_doors: m.number_of_doors,
                fuel_type: m.fuel_type,
                engine: m.engine,
                mileage: m.mileage,
                model_year: m.model_year,
                production_year: m.production_year,
                external_color: m.external_color,
            },
            location: Location::new(m.lat, m.lon),
            created_at: Some(m.created_at.with_timezone(&Utc)),
            modified_at: Some(m.modified_at.with_timezone(&Utc)),
            price: None,
        }
    }
}

/// Copy every persisted field of `car` into `am`. Id and `created_at` are left alone.
pub fn assign(am: &mut ActiveModel, car: &Car, now: DateTime<Utc>) {
    let d = &car.details;
    am.condition = Set(car.condition);
    am.body = Set(d.body.clone());
    am.model = Set(d.model.clone());
    am.manufacturer_code = Set(d.manufacturer.as_ref().map(|m| m.code));
    am.manufacturer_name = Set(d.manufacturer.as_ref().map(|m| m.name.clone()));
    am.number_of_doors = Set(d.number_of_doors);
    am.fuel_type = Set(d.fuel_type.clone());
    am.engine = Set(d.engine.clone());
    am.mileage = Set(d.mileage);
    am.model_year = Set(d.model_year);
    am.production_year = Set(d.production_year);
    am.external_color = Set(d.external_color.clone());
    am.lat = Set(car.location.lat);
    am.lon = Set(car.location.lon);
    am.modified_at = Set(now.into());
}

/// Active model for a first insert; the id is left for the database to assign.
pub fn new_active_model(car: &Car, now: DateTime<Utc>) -> ActiveModel {
    let mut am = ActiveModel { created_at: Set(now.into()), ..Default::default() };
    assign(&mut am, car, now);
    am
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn row_without_manufacturer_name_maps_to_none() {
        let now = Utc::now();
        let m = Model {
            id: 7,
            condition: Condition::New,
            body: None,
            model: Some("Focus".into()),
            manufacturer_code: Some(102),
            manufacturer_name: None,
            number_of_doors: None,
            fuel_type: None,
            engine: None,
            mileage: None,
            model_year: None,
            production_year: None,
            external_color: None,
            lat: 1.0,
            lon: 2.0,
            created_at: now.into(),
            modified_at: now.into(),
        };
        let car: Car = m.into();
        assert_eq!(car.id, Some(7));
        assert_eq!(car.details.manufacturer, None);
        assert_eq!(car.created_at, Some(now));
    }

    #[test]
    fn new_active_model_leaves_id_unset() {
        let car = Car::new(Condition::Used, Details::default(), Location::new(0.5, 0.5));
        let am = new_active_model(&car, Utc::now());
        assert!(matches!(am.id, ActiveValue::NotSet));
        assert!(matches!(am.lat, ActiveValue::Set(v) if v == 0.5));
    }
}
