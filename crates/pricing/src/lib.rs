//! Pricing service: a fixed, randomly generated price per vehicle id,
//! served at `GET /services/price?vehicleId=`.

pub mod prices;
pub mod routes;
pub mod startup;

pub use startup::run;
