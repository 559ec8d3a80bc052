//! Car domain types as they appear on the wire.
//!
//! `CarInput` is the request-body shape shared by create and update. Create
//! goes through [`CarInput::validate_new`], which enforces presence; update
//! goes through [`CarInput::validate_patch`] and [`Car::merge`], which only
//! touch the fields the caller sent.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "USED")]
    Used,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub code: i32,
    pub name: String,
}

impl Manufacturer {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self { code, name: name.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub body: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<Manufacturer>,
    pub number_of_doors: Option<i32>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub mileage: Option<i32>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub external_color: Option<String>,
}

/// Coordinates plus the reverse-geocoded address attached on reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, ..Default::default() }
    }

    /// Drop the enrichment fields, keeping only what is persisted.
    pub fn coordinates(&self) -> Self {
        Self::new(self.lat, self.lon)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Option<i64>,
    pub condition: Condition,
    pub details: Details,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Car {
    /// An unsaved car; the store assigns id and timestamps.
    pub fn new(condition: Condition, details: Details, location: Location) -> Self {
        Self { id: None, condition, details, location, created_at: None, modified_at: None, price: None }
    }

    /// Overwrite only the fields present in `input`. Details merge field by
    /// field; a location replaces the coordinates and clears the stale address.
    pub fn merge(&mut self, input: CarInput) {
        if let Some(condition) = input.condition {
            self.condition = condition;
        }
        if let Some(d) = input.details {
            let current = &mut self.details;
            if d.body.is_some() {
                current.body = d.body;
            }
            if d.model.is_some() {
                current.model = d.model;
            }
            if d.manufacturer.is_some() {
                current.manufacturer = d.manufacturer;
            }
            if d.number_of_doors.is_some() {
                current.number_of_doors = d.number_of_doors;
            }
            if d.fuel_type.is_some() {
                current.fuel_type = d.fuel_type;
            }
            if d.engine.is_some() {
                current.engine = d.engine;
            }
            if d.mileage.is_some() {
                current.mileage = d.mileage;
            }
            if d.model_year.is_some() {
                current.model_year = d.model_year;
            }
            if d.production_year.is_some() {
                current.production_year = d.production_year;
            }
            if d.external_color.is_some() {
                current.external_color = d.external_color;
            }
        }
        if let Some(location) = input.location {
            self.location = location.coordinates();
        }
    }
}

/// Request body for POST and PUT. Unknown fields such as `id`, `price` or
/// `_links` are ignored so a fetched resource can be sent back as-is.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub condition: Option<Condition>,
    pub details: Option<Details>,
    pub location: Option<Location>,
}

impl CarInput {
    /// Presence and range checks for creation. All violations are reported together.
    pub fn validate_new(self) -> Result<Car, ModelError> {
        let mut errors = Vec::new();
        if self.condition.is_none() {
            errors.push("condition must not be null".to_string());
        }
        match &self.details {
            None => errors.push("details must not be null".to_string()),
            Some(d) => {
                if d.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
                    errors.push("details.model must not be blank".to_string());
                }
                if d.manufacturer.is_none() {
                    errors.push("details.manufacturer must not be null".to_string());
                }
                check_details(d, &mut errors);
            }
        }
        match &self.location {
            None => errors.push("location must not be null".to_string()),
            Some(l) => check_location(l, &mut errors),
        }
        if !errors.is_empty() {
            return Err(ModelError::invalid(errors));
        }
        match (self.condition, self.details, self.location) {
            (Some(condition), Some(details), Some(location)) => {
                Ok(Car::new(condition, details, location.coordinates()))
            }
            _ => Err(ModelError::Validation("incomplete car".into())),
        }
    }

    /// Range checks on whatever fields are present; nothing is required.
    pub fn validate_patch(&self) -> Result<(), ModelError> {
        let mut errors = Vec::new();
        if let Some(d) = &self.details {
            if matches!(d.model.as_deref(), Some(m) if m.trim().is_empty()) {
                errors.push("details.model must not be blank".to_string());
            }
            check_details(d, &mut errors);
        }
        if let Some(l) = &self.location {
            check_location(l, &mut errors);
        }
        if errors.is_empty() { Ok(()) } else { Err(ModelError::invalid(errors)) }
    }
}

fn check_details(d: &Details, errors: &mut Vec<String>) {
    if let Some(m) = &d.manufacturer {
        if m.name.trim().is_empty() {
            errors.push("details.manufacturer.name must not be blank".to_string());
        }
    }
    if matches!(d.number_of_doors, Some(n) if n < 0) {
        errors.push("details.numberOfDoors must not be negative".to_string());
    }
    if matches!(d.mileage, Some(n) if n < 0) {
        errors.push("details.mileage must not be negative".to_string());
    }
}

fn check_location(l: &Location, errors: &mut Vec<String>) {
    if !(-90.0..=90.0).contains(&l.lat) {
        errors.push("location.lat must be within [-90, 90]".to_string());
    }
    if !(-180.0..=180.0).contains(&l.lon) {
        errors.push("location.lon must be within [-180, 180]".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn impala() -> serde_json::Value {
        json!({
            "condition": "USED",
            "details": {
                "body": "sedan",
                "model": "Impala",
                "manufacturer": {"code": 101, "name": "Chevrolet"},
                "numberOfDoors": 4,
                "fuelType": "Gasoline",
                "engine": "3.6L V6",
                "mileage": 32280,
                "modelYear": 2018,
                "productionYear": 2018,
                "externalColor": "white"
            },
            "location": {"lat": 40.730610, "lon": -73.935242}
        })
    }

    #[test]
    fn valid_input_becomes_unsaved_car() {
        let input: CarInput = serde_json::from_value(impala()).unwrap();
        let car = input.validate_new().unwrap();
        assert_eq!(car.id, None);
        assert_eq!(car.condition, Condition::Used);
        assert_eq!(car.details.model.as_deref(), Some("Impala"));
        assert_eq!(car.details.manufacturer, Some(Manufacturer::new(101, "Chevrolet")));
        assert_eq!(car.location, Location::new(40.730610, -73.935242));
    }

    #[test]
    fn missing_condition_is_rejected() {
        let mut body = impala();
        body.as_object_mut().unwrap().remove("condition");
        let input: CarInput = serde_json::from_value(body).unwrap();
        let err = input.validate_new().unwrap_err();
        assert!(err.to_string().contains("condition must not be null"));
    }

    #[test]
    fn all_violations_are_reported_together() {
        let input: CarInput = serde_json::from_value(json!({"location": {"lat": 91.0, "lon": 0.0}})).unwrap();
        let msg = input.validate_new().unwrap_err().to_string();
        assert!(msg.contains("condition"));
        assert!(msg.contains("details must not be null"));
        assert!(msg.contains("location.lat"));
    }

    #[test]
    fn blank_model_is_rejected() {
        let mut body = impala();
        body["details"]["model"] = json!("  ");
        let input: CarInput = serde_json::from_value(body).unwrap();
        assert!(input.validate_new().is_err());
    }

    #[test]
    fn enrichment_fields_in_input_are_not_kept() {
        let mut body = impala();
        body["location"]["address"] = json!("777 Brockton Avenue");
        body["price"] = json!("USD 1.00");
        let input: CarInput = serde_json::from_value(body).unwrap();
        let car = input.validate_new().unwrap();
        assert_eq!(car.location.address, None);
        assert_eq!(car.price, None);
    }

    #[test]
    fn merge_condition_only_leaves_details() {
        let mut car = CarInput::validate_new(serde_json::from_value(impala()).unwrap()).unwrap();
        let before = car.details.clone();
        car.merge(CarInput { condition: Some(Condition::New), ..Default::default() });
        assert_eq!(car.condition, Condition::New);
        assert_eq!(car.details, before);
    }

    #[test]
    fn merge_details_overwrites_only_present_fields() {
        let mut car = CarInput::validate_new(serde_json::from_value(impala()).unwrap()).unwrap();
        let patch: CarInput = serde_json::from_value(json!({
            "details": {"model": "Malibu", "mileage": 40000}
        }))
        .unwrap();
        patch.validate_patch().unwrap();
        car.merge(patch);
        assert_eq!(car.details.model.as_deref(), Some("Malibu"));
        assert_eq!(car.details.mileage, Some(40000));
        assert_eq!(car.details.body.as_deref(), Some("sedan"));
        assert_eq!(car.details.external_color.as_deref(), Some("white"));
        assert_eq!(car.condition, Condition::Used);
    }

    #[test]
    fn merge_location_clears_address() {
        let mut car = CarInput::validate_new(serde_json::from_value(impala()).unwrap()).unwrap();
        car.location.address = Some("old".into());
        car.merge(CarInput { location: Some(Location::new(1.0, 2.0)), ..Default::default() });
        assert_eq!(car.location, Location::new(1.0, 2.0));
    }

    #[test]
    fn patch_checks_ranges_of_present_fields() {
        let patch: CarInput = serde_json::from_value(json!({"details": {"mileage": -1}})).unwrap();
        assert!(patch.validate_patch().is_err());
        assert!(CarInput::default().validate_patch().is_ok());
    }

    #[test]
    fn condition_serializes_upper_case() {
        assert_eq!(serde_json::to_value(Condition::New).unwrap(), json!("NEW"));
        let c: Condition = serde_json::from_value(json!("USED")).unwrap();
        assert_eq!(c, Condition::Used);
    }

    #[test]
    fn car_json_uses_camel_case() {
        let car = CarInput::validate_new(serde_json::from_value(impala()).unwrap()).unwrap();
        let v = serde_json::to_value(&car).unwrap();
        assert_eq!(v["details"]["numberOfDoors"], 4);
        assert_eq!(v["details"]["externalColor"], "white");
        assert!(v.get("price").is_none());
    }
}
