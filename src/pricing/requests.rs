//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::calculators::AddOn;
use super::models::LineItem;

/// Request to price raw line items
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Defaults to the configured service fee
    #[serde(default)]
    pub service_fee: Option<Decimal>,
    /// Defaults to the configured tax rate
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}

/// Request to price a cart of catalog bikes
#[derive(Debug, Deserialize)]
pub struct CartQuoteRequest {
    pub items: Vec<CartLineRequest>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// A bike in the cart request
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub bike_id: i64,
    pub duration_hours: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Request to quote a single booking
#[derive(Debug, Deserialize)]
pub struct BookingQuoteRequest {
    pub duration_hours: i32,
    /// Pickup slot as `HH:MM`
    pub time_slot: String,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    /// Price the booking against a catalog bike instead of the flat booking rate
    #[serde(default)]
    pub bike_id: Option<i64>,
}
