/// Car entity persistence against in-memory sqlite
pub mod car_tests {
    use anyhow::Result;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, EntityTrait};

    use crate::{car, db::connect_in_memory, Car, Condition, Details, Location, Manufacturer};

    fn impala() -> Car {
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

    #[tokio::test]
    async fn insert_assigns_sequential_ids() -> Result<()> {
        let db = connect_in_memory().await?;
        let first = car::new_active_model(&impala(), Utc::now()).insert(&db).await?;
        let second = car::new_active_model(&impala(), Utc::now()).insert(&db).await?;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn stored_row_maps_back_to_same_car() -> Result<()> {
        let db = connect_in_memory().await?;
        let original = impala();
        let row = car::new_active_model(&original, Utc::now()).insert(&db).await?;

        let found = car::Entity::find_by_id(row.id).one(&db).await?.expect("row");
        let back: Car = found.into();
        assert_eq!(back.id, Some(row.id));
        assert_eq!(back.condition, original.condition);
        assert_eq!(back.details, original.details);
        assert_eq!(back.location, original.location);
        assert!(back.created_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn assign_overwrites_every_persisted_field() -> Result<()> {
        let db = connect_in_memory().await?;
        let row = car::new_active_model(&impala(), Utc::now()).insert(&db).await?;
        let created_at = row.created_at;

        let mut replacement = impala();
        replacement.condition = Condition::New;
        replacement.details.model = Some("Malibu".into());
        replacement.details.engine = None;
        let mut am: car::ActiveModel = row.into();
        car::assign(&mut am, &replacement, Utc::now());
        let updated = am.update(&db).await?;

        assert_eq!(updated.condition, Condition::New);
        assert_eq!(updated.model.as_deref(), Some("Malibu"));
        assert_eq!(updated.engine, None);
        assert_eq!(updated.created_at, created_at);
        Ok(())
    }
}
