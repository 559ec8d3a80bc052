use async_trait::async_trait;
use models::Car;

use crate::errors::ServiceError;

/// Persistence gateway for cars, keyed by the store-assigned id.
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// All cars in id order.
    async fn list(&self) -> Result<Vec<Car>, ServiceError>;
    async fn find(&self, id: i64) -> Result<Option<Car>, ServiceError>;
    /// Store a new row; `car.id` is ignored and the assigned one returned.
    async fn insert(&self, car: &Car) -> Result<Car, ServiceError>;
    /// Overwrite the row with `car.id`. Fails with `NotFound` when absent.
    async fn update(&self, car: &Car) -> Result<Car, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCarRepository {
        state: Mutex<State>,
    }

    #[derive(Default)]
    struct State {
        rows: BTreeMap<i64, Car>,
        last_id: i64,
    }

    impl InMemoryCarRepository {
        pub fn len(&self) -> usize {
            self.state.lock().unwrap().rows.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl CarRepository for InMemoryCarRepository {
        async fn list(&self) -> Result<Vec<Car>, ServiceError> {
            let state = self.state.lock().unwrap();
            Ok(state.rows.values().cloned().collect())
        }

        async fn find(&self, id: i64) -> Result<Option<Car>, ServiceError> {
            let state = self.state.lock().unwrap();
            Ok(state.rows.get(&id).cloned())
        }

        async fn insert(&self, car: &Car) -> Result<Car, ServiceError> {
            let mut state = self.state.lock().unwrap();
            state.last_id += 1;
            let id = state.last_id;
            let now = Utc::now();
            let stored = Car {
                id: Some(id),
                location: car.location.coordinates(),
                created_at: Some(now),
                modified_at: Some(now),
                price: None,
                ..car.clone()
            };
            state.rows.insert(id, stored.clone());
            Ok(stored)
        }

        async fn update(&self, car: &Car) -> Result<Car, ServiceError> {
            let id = car.id.ok_or_else(|| ServiceError::Validation("car id is required for update".into()))?;
            let mut state = self.state.lock().unwrap();
            let existing = state.rows.get(&id).ok_or_else(|| ServiceError::car_not_found(id))?;
            let stored = Car {
                id: Some(id),
                location: car.location.coordinates(),
                created_at: existing.created_at,
                modified_at: Some(Utc::now()),
                price: None,
                ..car.clone()
            };
            state.rows.insert(id, stored.clone());
            Ok(stored)
        }

        async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
            let mut state = self.state.lock().unwrap();
            Ok(state.rows.remove(&id).is_some())
        }
    }
}
