//! Database queries for the bike catalog.

use sqlx::PgPool;

use crate::error::Result;

use super::models::{Bike, BikeFilter};

/// Get an active bike by id
pub async fn get_bike(pool: &PgPool, bike_id: i64) -> Result<Option<Bike>> {
    let bike = sqlx::query_as::<_, Bike>(
        r#"
        SELECT id, brand, model, year,
               COALESCE(type::TEXT, 'STANDARD') AS type,
               city, price_per_hour,
               COALESCE(status::TEXT, 'AVAILABLE') AS status
        FROM bikes
        WHERE id = $1
          AND is_active = TRUE
        "#,
    )
    .bind(bike_id)
    .fetch_optional(pool)
    .await?;

    Ok(bike)
}

/// List active bikes matching `filter`, ordered by id
pub async fn list_bikes(pool: &PgPool, filter: &BikeFilter) -> Result<Vec<Bike>> {
    let bikes = sqlx::query_as::<_, Bike>(
        r#"
        SELECT id, brand, model, year,
               COALESCE(type::TEXT, 'STANDARD') AS type,
               city, price_per_hour,
               COALESCE(status::TEXT, 'AVAILABLE') AS status
        FROM bikes
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR LOWER(city) = LOWER($1))
          AND ($2::TEXT IS NULL OR LOWER(brand) = LOWER($2))
          AND ($3::TEXT IS NULL OR COALESCE(type::TEXT, 'STANDARD') = $3)
          AND ($4::TEXT IS NULL OR COALESCE(status::TEXT, 'AVAILABLE') = $4)
        ORDER BY id
        "#,
    )
    .bind(filter.city.as_deref().map(str::trim))
    .bind(filter.brand.as_deref().map(str::trim))
    .bind(filter.bike_type.map(|t| t.as_str()))
    .bind(filter.status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(bikes)
}
