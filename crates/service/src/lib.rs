//! Service layer for the vehicles API.
//! - `car`: persistence gateway and the `CarService` that enriches reads.
//! - `clients`: outbound HTTP collaborators (pricing, maps).

pub mod errors;
pub mod car;
pub mod clients;
#[cfg(test)]
pub mod test_support;
