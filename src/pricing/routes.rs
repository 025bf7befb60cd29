//! Pricing route handlers

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::requests::{BookingQuoteRequest, CalculateRequest, CartQuoteRequest};
use super::responses::{
    BookingQuoteResponse, CartItemResponse, CouponResponse, PricingSummaryResponse,
};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/coupons/:code", get(coupon))
        .route("/api/pricing/calculate", post(calculate))
        .route("/api/pricing/cart", post(cart))
        .route("/api/pricing/booking", post(booking))
}

/// Coupon lookup
async fn coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CouponResponse>> {
    let coupon = state.coupons.lookup(&code)?;
    Ok(Json(CouponResponse::from(coupon)))
}

/// Price raw line items
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<PricingSummaryResponse>> {
    let config = &state.config;
    let quote = services::quote_items(
        &state.coupons,
        &req.items,
        req.coupon_code.as_deref(),
        req.service_fee.unwrap_or(config.service_fee),
        req.tax_rate.unwrap_or(config.tax_rate),
    )?;

    let mut response = PricingSummaryResponse::new(&quote.pricing, &config.currency);
    response.coupon = quote.coupon.coupon.map(CouponResponse::from);
    response.coupon_message = quote.coupon.message;
    Ok(Json(response))
}

/// Price a cart of catalog bikes
async fn cart(
    State(state): State<AppState>,
    Json(req): Json<CartQuoteRequest>,
) -> Result<Json<PricingSummaryResponse>> {
    let config = &state.config;
    let quote = services::quote_cart(
        &state.catalog,
        &state.cache,
        &state.coupons,
        &req.items,
        req.coupon_code.as_deref(),
        config.service_fee,
        config.tax_rate,
    )
    .await?;

    let mut response = PricingSummaryResponse::new(&quote.pricing, &config.currency);
    response.coupon = quote.cart.applied_coupon().map(CouponResponse::from);
    response.coupon_message = quote.coupon_message;
    response.items = quote
        .cart
        .items()
        .iter()
        .map(|item| CartItemResponse::new(item, &config.currency))
        .collect::<std::result::Result<_, _>>()?;
    Ok(Json(response))
}

/// Quote a single booking
async fn booking(
    State(state): State<AppState>,
    Json(req): Json<BookingQuoteRequest>,
) -> Result<Json<BookingQuoteResponse>> {
    let config = &state.config;
    let quote = services::quote_booking(
        &state.catalog,
        &state.cache,
        req.bike_id,
        config.booking_hourly_rate,
        req.duration_hours,
        &req.time_slot,
        &req.add_ons,
        config.tax_rate,
    )
    .await?;

    Ok(Json(BookingQuoteResponse::new(quote, &config.currency)))
}
