//! Car module: repository abstraction, sea-orm backend, and the service that
//! orchestrates persistence with price and address enrichment.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::CarRepository;
pub use service::CarService;
