//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartItem;

use super::calculators::{AddOn, BookingQuote};
use super::coupons::{Coupon, CouponKind};
use super::models::{PricingError, PricingResult};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Coupon as shown to the customer
#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub code: String,
    pub name: String,
    pub kind: CouponKind,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl From<&Coupon> for CouponResponse {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            name: coupon.name.clone(),
            kind: coupon.kind,
            amount: coupon.amount,
        }
    }
}

/// Response for a priced cart or line item list
#[derive(Debug, Serialize)]
pub struct PricingSummaryResponse {
    pub subtotal: MoneyResponse,
    pub discount: MoneyResponse,
    pub service_fee: MoneyResponse,
    pub tax: MoneyResponse,
    pub total: MoneyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponResponse>,
    /// Set when a coupon code was given but not applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CartItemResponse>,
}

impl PricingSummaryResponse {
    pub fn new(result: &PricingResult, currency: &str) -> Self {
        Self {
            subtotal: MoneyResponse::new(result.subtotal, currency),
            discount: MoneyResponse::new(result.discount, currency),
            service_fee: MoneyResponse::new(result.service_fee, currency),
            tax: MoneyResponse::new(result.tax, currency),
            total: MoneyResponse::new(result.total, currency),
            coupon: None,
            coupon_message: None,
            items: Vec::new(),
        }
    }
}

/// A resolved cart line
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub bike_id: i64,
    pub name: String,
    pub price_per_hour: MoneyResponse,
    pub duration_hours: i32,
    pub quantity: i32,
    pub total_price: MoneyResponse,
}

impl CartItemResponse {
    pub fn new(item: &CartItem, currency: &str) -> Result<Self, PricingError> {
        let total_price = item
            .total_price()
            .ok_or_else(|| PricingError::overflow("line total"))?;
        Ok(Self {
            bike_id: item.bike_id,
            name: item.name.clone(),
            price_per_hour: MoneyResponse::new(item.price_per_hour, currency),
            duration_hours: item.duration_hours,
            quantity: item.quantity,
            total_price: MoneyResponse::new(total_price, currency),
        })
    }
}

/// Response for a booking quote
#[derive(Debug, Serialize)]
pub struct BookingQuoteResponse {
    pub base_price: MoneyResponse,
    pub add_ons: Vec<AddOn>,
    pub add_ons_total: MoneyResponse,
    pub subtotal: MoneyResponse,
    pub tax: MoneyResponse,
    pub total: MoneyResponse,
    pub pickup_time: String,
    pub drop_time: String,
}

impl BookingQuoteResponse {
    pub fn new(quote: BookingQuote, currency: &str) -> Self {
        Self {
            base_price: MoneyResponse::new(quote.base_price, currency),
            add_ons_total: MoneyResponse::new(quote.add_ons_total, currency),
            subtotal: MoneyResponse::new(quote.subtotal, currency),
            tax: MoneyResponse::new(quote.tax, currency),
            total: MoneyResponse::new(quote.total, currency),
            pickup_time: quote.pickup_time.format("%H:%M").to_string(),
            drop_time: quote.drop_time.format("%H:%M").to_string(),
            add_ons: quote.add_ons,
        }
    }
}
