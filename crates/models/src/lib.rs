pub mod errors;
pub mod db;
pub mod vehicle;
pub mod car;

pub use vehicle::{Car, CarInput, Condition, Details, Location, Manufacturer};

#[cfg(test)]
mod tests;
