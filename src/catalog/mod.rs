//! Bike catalog data source.
//!
//! The catalog is either a fixture loaded from a JSON file or the `bikes`
//! table in Postgres. Callers pick one at start-up and pass it around in
//! `AppState`; lookups go through the shared `AppCache`.

pub mod models;
pub mod queries;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::AppCache;
use crate::error::{AppError, Result};
use crate::pricing::PricingError;

pub use models::{Bike, BikeFilter, BikeStatus, BikeType};

/// Where bikes come from.
#[derive(Clone)]
pub enum BikeCatalog {
    /// In-memory bikes keyed by id
    Fixture(Arc<BTreeMap<i64, Bike>>),
    /// `bikes` table
    Postgres(PgPool),
}

impl BikeCatalog {
    /// Fixture catalog from a list of bikes. Later duplicates win.
    pub fn fixture(bikes: impl IntoIterator<Item = Bike>) -> Self {
        let map = bikes.into_iter().map(|b| (b.id, b)).collect();
        BikeCatalog::Fixture(Arc::new(map))
    }

    /// Fixture catalog read from a JSON array of bikes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read bike fixture {}: {}", path.display(), e))
        })?;
        let bikes: Vec<Bike> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Internal(format!("Failed to parse bike fixture {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded {} bikes from {}", bikes.len(), path.display());
        Ok(Self::fixture(bikes))
    }

    /// Look up an active bike, cache first.
    pub async fn find_bike(&self, cache: &AppCache, bike_id: i64) -> Result<Bike> {
        if let Some(cached) = cache.bikes.get(&bike_id).await {
            tracing::debug!("Cache HIT for bike: {}", bike_id);
            return Ok((*cached).clone());
        }
        tracing::debug!("Cache MISS for bike: {}", bike_id);

        let bike = match self {
            BikeCatalog::Fixture(bikes) => bikes.get(&bike_id).cloned(),
            BikeCatalog::Postgres(pool) => queries::get_bike(pool, bike_id).await?,
        }
        .ok_or(PricingError::BikeNotFound { bike_id })?;

        cache.bikes.insert(bike_id, Arc::new(bike.clone())).await;
        Ok(bike)
    }

    /// Look up a bike that can be rented right now.
    ///
    /// Status comes through the cache, so a status change shows up once the
    /// entry is invalidated or expires.
    pub async fn find_available_bike(&self, cache: &AppCache, bike_id: i64) -> Result<Bike> {
        let bike = self.find_bike(cache, bike_id).await?;
        if !bike.is_available() {
            return Err(PricingError::BikeUnavailable {
                bike_id,
                status: bike.status,
            }
            .into());
        }
        Ok(bike)
    }

    /// Active bikes matching `filter`, ordered by id.
    pub async fn list_bikes(&self, filter: &BikeFilter) -> Result<Vec<Bike>> {
        match self {
            BikeCatalog::Fixture(bikes) => Ok(bikes
                .values()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect()),
            BikeCatalog::Postgres(pool) => queries::list_bikes(pool, filter).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn bike(id: i64, price: rust_decimal::Decimal) -> Bike {
        Bike {
            id,
            brand: "Yamaha".to_string(),
            model: "MT-07".to_string(),
            year: 2023,
            bike_type: BikeType::Standard,
            city: "Mumbai".to_string(),
            price_per_hour: price,
            status: BikeStatus::Available,
        }
    }

    #[tokio::test]
    async fn test_find_bike_populates_cache() {
        let catalog = BikeCatalog::fixture(vec![bike(2, dec!(1660))]);
        let cache = AppCache::new();

        let found = catalog.find_bike(&cache, 2).await.unwrap();
        assert_eq!(found.price_per_hour, dec!(1660));
        assert!(cache.bikes.get(&2).await.is_some());
    }

    #[tokio::test]
    async fn test_find_bike_missing() {
        let catalog = BikeCatalog::fixture(Vec::new());
        let cache = AppCache::new();

        let err = catalog.find_bike(&cache, 42).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::BikeNotFound { bike_id: 42 })
        ));
    }

    #[tokio::test]
    async fn test_list_bikes_ordered_by_id() {
        let catalog = BikeCatalog::fixture(vec![bike(3, dec!(1826)), bike(1, dec!(1660))]);

        let ids: Vec<i64> = catalog.list_bikes(&BikeFilter::default()).await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_find_available_bike_rejects_booked() {
        let mut booked = bike(8, dec!(900));
        booked.status = BikeStatus::Booked;
        let catalog = BikeCatalog::fixture(vec![bike(2, dec!(1660)), booked]);
        let cache = AppCache::new();

        assert!(catalog.find_available_bike(&cache, 2).await.is_ok());

        let err = catalog.find_available_bike(&cache, 8).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::BikeUnavailable {
                bike_id: 8,
                status: BikeStatus::Booked
            })
        ));
        assert_eq!(err.to_string(), "Bike 8 is currently booked");

        // still listed and visible to plain lookups
        assert!(catalog.find_bike(&cache, 8).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_bikes_filters() {
        let mut pune = bike(1, dec!(2490));
        pune.brand = "Ducati".to_string();
        pune.city = "Pune".to_string();
        pune.bike_type = BikeType::Sport;
        let mut cruiser = bike(2, dec!(450));
        cruiser.bike_type = BikeType::Cruiser;
        cruiser.status = BikeStatus::Maintenance;
        let catalog = BikeCatalog::fixture(vec![pune, cruiser, bike(3, dec!(1660))]);

        let ids = |bikes: Vec<Bike>| bikes.iter().map(|b| b.id).collect::<Vec<_>>();

        let by_city = BikeFilter {
            city: Some("mumbai".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(catalog.list_bikes(&by_city).await.unwrap()), vec![2, 3]);

        let by_brand = BikeFilter {
            brand: Some("ducati".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(catalog.list_bikes(&by_brand).await.unwrap()), vec![1]);

        let by_type = BikeFilter {
            bike_type: Some(BikeType::Cruiser),
            ..Default::default()
        };
        assert_eq!(ids(catalog.list_bikes(&by_type).await.unwrap()), vec![2]);

        let available = BikeFilter {
            status: Some(BikeStatus::Available),
            ..Default::default()
        };
        assert_eq!(ids(catalog.list_bikes(&available).await.unwrap()), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 7, "brand": "Kawasaki", "model": "Ninja 650", "year": 2023,
                 "city": "Goa", "price_per_hour": "1826"}}]"#
        )
        .unwrap();

        let catalog = BikeCatalog::from_file(file.path()).unwrap();
        let bikes = catalog.list_bikes(&BikeFilter::default()).await.unwrap();
        assert_eq!(bikes.len(), 1);
        assert_eq!(bikes[0].display_name(), "Kawasaki Ninja 650 (2023)");
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(BikeCatalog::from_file(file.path()).is_err());
    }
}
