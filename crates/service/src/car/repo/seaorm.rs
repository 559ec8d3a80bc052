use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

use models::{car, Car};

use crate::car::repository::CarRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmCarRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn list(&self) -> Result<Vec<Car>, ServiceError> {
        let rows = car::Entity::find()
            .order_by_asc(car::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Car>, ServiceError> {
        let found = car::Entity::find_by_id(id).one(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.map(Car::from))
    }

    async fn insert(&self, new_car: &Car) -> Result<Car, ServiceError> {
        let created = car::new_active_model(new_car, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(created.into())
    }

    async fn update(&self, changed: &Car) -> Result<Car, ServiceError> {
        let id = changed.id.ok_or_else(|| ServiceError::Validation("car id is required for update".into()))?;
        let current = car::Entity::find_by_id(id).one(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let Some(existing) = current else { return Err(ServiceError::car_not_found(id)); };
        let mut am: car::ActiveModel = existing.into();
        car::assign(&mut am, changed, Utc::now());
        let updated = am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = car::Entity::delete_by_id(id).exec(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }
}
