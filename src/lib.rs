//! SpinGo checkout service: rental pricing, coupons and payment validation
//! behind a small JSON API.

pub mod cache;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod payment;
pub mod pricing;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::{AppCache, CacheStats};
use crate::catalog::{Bike, BikeCatalog, BikeFilter, BikeStatus};
use crate::config::Config;
use crate::error::AppError;
use crate::pricing::CouponRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: BikeCatalog,
    pub cache: AppCache,
    pub coupons: Arc<CouponRegistry>,
}

impl AppState {
    pub fn new(config: Config, catalog: BikeCatalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            cache: AppCache::new(),
            coupons: Arc::new(CouponRegistry::new()),
        }
    }
}

/// Build the full router with middleware
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/bikes", get(bikes))
        .route("/api/bikes/:id/availability", get(bike_availability))
        .route("/api/cache/invalidate", post(invalidate_cache))
        .route("/api/cache/bikes/:id", delete(invalidate_bike))
        .merge(pricing::router())
        .merge(payment::router())
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}

async fn bikes(
    State(state): State<AppState>,
    Query(filter): Query<BikeFilter>,
) -> error::Result<Json<Vec<Bike>>> {
    Ok(Json(state.catalog.list_bikes(&filter).await?))
}

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    bike_id: i64,
    available: bool,
    status: BikeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

async fn bike_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> error::Result<Json<AvailabilityResponse>> {
    let bike = state.catalog.find_bike(&state.cache, id).await?;
    let available = bike.is_available();
    Ok(Json(AvailabilityResponse {
        bike_id: bike.id,
        available,
        status: bike.status,
        reason: (!available).then(|| format!("Bike is currently {}", bike.status)),
    }))
}

async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}

async fn invalidate_bike(State(state): State<AppState>, Path(id): Path<i64>) -> StatusCode {
    state.cache.invalidate_bike(id).await;
    StatusCode::NO_CONTENT
}

async fn not_found() -> AppError {
    AppError::NotFound
}


#[cfg(test)]
mod tests {
    use super::test_support::{get_json, post_json, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_bikes() {
        let (status, body) = get_json(test_app(), "/api/bikes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[2]["model"], "Ninja 650");
        assert_eq!(body[2]["price_per_hour"], "1826");
        assert_eq!(body[2]["type"], "sport");
        assert_eq!(body[3]["status"], "booked");
    }

    #[tokio::test]
    async fn test_list_bikes_with_filters() {
        let (status, body) = get_json(test_app(), "/api/bikes?status=available").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = get_json(test_app(), "/api/bikes?city=jaipur&type=cruiser").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 6);

        let (_, body) = get_json(test_app(), "/api/bikes?brand=Honda&status=booked").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bike_availability() {
        let (status, body) = get_json(test_app(), "/api/bikes/1/availability").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        assert!(body.get("reason").is_none());

        let (_, body) = get_json(test_app(), "/api/bikes/6/availability").await;
        assert_eq!(body["available"], false);
        assert_eq!(body["status"], "booked");
        assert_eq!(body["reason"], "Bike is currently booked");

        let (status, _) = get_json(test_app(), "/api/bikes/404/availability").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_json(test_app(), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], "not_found");
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let (status, body) =
            post_json(test_app(), "/api/cache/invalidate", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
    }
}
