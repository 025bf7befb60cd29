//! In-memory caching using moka
//!
//! Bike prices change rarely, so catalog lookups are cached with a short TTL
//! to keep cart quotes off the database.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::catalog::Bike;

/// Application cache holding catalog entries
#[derive(Clone)]
pub struct AppCache {
    /// Bikes (id -> Bike)
    pub bikes: Cache<i64, Arc<Bike>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Bikes: 1000 entries, 10 min TTL, 5 min idle
            bikes: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            bikes_size: self.bikes.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.bikes.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a single bike, e.g. after a price change
    pub async fn invalidate_bike(&self, bike_id: i64) {
        self.bikes.invalidate(&bike_id).await;
        info!("Cache invalidated for bike: {}", bike_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub bikes_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BikeStatus, BikeType};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_invalidate_bike() {
        let cache = AppCache::new();
        let bike = Bike {
            id: 5,
            brand: "Royal Enfield".to_string(),
            model: "Classic 350".to_string(),
            year: 2022,
            bike_type: BikeType::Standard,
            city: "Jaipur".to_string(),
            price_per_hour: dec!(450),
            status: BikeStatus::Available,
        };
        cache.bikes.insert(5, Arc::new(bike)).await;
        assert!(cache.bikes.get(&5).await.is_some());

        cache.invalidate_bike(5).await;
        assert!(cache.bikes.get(&5).await.is_none());
    }
}
