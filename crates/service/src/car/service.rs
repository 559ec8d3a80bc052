use std::sync::Arc;

use common::metrics::{CAR_MUTATIONS_TOTAL, ENRICHMENT_FAILURES_TOTAL, OUTBOUND_CALLS_TOTAL};
use models::Car;
use tracing::{info, instrument, warn};

use crate::car::repository::CarRepository;
use crate::clients::{MapsClient, PriceClient};
use crate::errors::ServiceError;

/// Car business service: persistence plus per-read enrichment.
///
/// Every read calls the price and maps collaborators once per car. A failed
/// enrichment leaves the field empty instead of failing the request.
pub struct CarService {
    repo: Arc<dyn CarRepository>,
    prices: Arc<dyn PriceClient>,
    maps: Arc<dyn MapsClient>,
}

impl CarService {
    pub fn new(repo: Arc<dyn CarRepository>, prices: Arc<dyn PriceClient>, maps: Arc<dyn MapsClient>) -> Self {
        Self { repo, prices, maps }
    }

    /// All cars, each with price and address attached.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Car>, ServiceError> {
        let cars = self.repo.list().await?;
        let mut enriched = Vec::with_capacity(cars.len());
        for car in cars {
            enriched.push(self.enrich(car).await);
        }
        Ok(enriched)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Car, ServiceError> {
        let car = self.repo.find(id).await?.ok_or_else(|| ServiceError::car_not_found(id))?;
        Ok(self.enrich(car).await)
    }

    /// The stored car as persisted, without calling the collaborators.
    #[instrument(skip(self))]
    pub async fn find_stored(&self, id: i64) -> Result<Car, ServiceError> {
        self.repo.find(id).await?.ok_or_else(|| ServiceError::car_not_found(id))
    }

    /// Insert when `car.id` is unset, otherwise overwrite the stored row.
    /// The returned car carries the stored state only, without enrichment.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::car::{repository::mock::InMemoryCarRepository, CarService};
    /// use service::clients::mock::{StubMapsClient, StubPriceClient};
    /// use models::{Car, Condition, Details, Location};
    /// let svc = CarService::new(
    ///     Arc::new(InMemoryCarRepository::default()),
    ///     Arc::new(StubPriceClient::failing()),
    ///     Arc::new(StubMapsClient::failing()),
    /// );
    /// let car = Car::new(Condition::New, Details::default(), Location::new(1.0, 2.0));
    /// let saved = tokio_test::block_on(svc.save(car)).unwrap();
    /// assert_eq!(saved.id, Some(1));
    /// assert!(saved.created_at.is_some());
    /// ```
    #[instrument(skip(self, car), fields(id = ?car.id))]
    pub async fn save(&self, car: Car) -> Result<Car, ServiceError> {
        let saved = match car.id {
            None => {
                let created = self.repo.insert(&car).await?;
                CAR_MUTATIONS_TOTAL.with_label_values(&["create"]).inc();
                info!(id = ?created.id, "car_created");
                created
            }
            Some(_) => {
                let updated = self.repo.update(&car).await?;
                CAR_MUTATIONS_TOTAL.with_label_values(&["update"]).inc();
                info!(id = ?updated.id, "car_updated");
                updated
            }
        };
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::car_not_found(id));
        }
        CAR_MUTATIONS_TOTAL.with_label_values(&["delete"]).inc();
        info!(id, "car_deleted");
        Ok(())
    }

    async fn enrich(&self, mut car: Car) -> Car {
        let Some(id) = car.id else { return car };

        OUTBOUND_CALLS_TOTAL.with_label_values(&["price"]).inc();
        match self.prices.price_for(id).await {
            Ok(price) => car.price = Some(price),
            Err(e) => {
                ENRICHMENT_FAILURES_TOTAL.with_label_values(&["price"]).inc();
                warn!(id, error = %e, "price lookup failed");
            }
        }

        OUTBOUND_CALLS_TOTAL.with_label_values(&["maps"]).inc();
        match self.maps.address_for(car.location.lat, car.location.lon).await {
            Ok(a) => {
                car.location.address = a.address;
                car.location.city = a.city;
                car.location.state = a.state;
                car.location.zip = a.zip;
            }
            Err(e) => {
                ENRICHMENT_FAILURES_TOTAL.with_label_values(&["maps"]).inc();
                warn!(id, error = %e, "address lookup failed");
            }
        }
        car
    }
}
