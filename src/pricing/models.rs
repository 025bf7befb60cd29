//! Value types shared by the pricing calculators, the coupon table and the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::BikeStatus;

/// Smallest quantity a cart line can hold.
pub const MIN_QUANTITY: i32 = 1;
/// Largest quantity a cart line can hold.
pub const MAX_QUANTITY: i32 = 5;

/// One rentable unit priced by the hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub unit_price: Decimal,
    pub duration_hours: i32,
    pub quantity: i32,
}

impl LineItem {
    pub fn new(unit_price: Decimal, duration_hours: i32, quantity: i32) -> Self {
        Self {
            unit_price,
            duration_hours,
            quantity,
        }
    }

    /// `unit_price * duration_hours * quantity`, unrounded. `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.duration_hours))?
            .checked_mul(Decimal::from(self.quantity))
    }

    /// Check the item bounds. `index` is only used for the error message.
    pub fn check(&self, index: usize) -> Result<(), PricingError> {
        if self.unit_price < Decimal::ZERO {
            return Err(PricingError::InvalidInput {
                index: Some(index),
                reason: format!("line {}: unit price {} is negative", index, self.unit_price),
            });
        }
        if self.duration_hours < 1 {
            return Err(PricingError::InvalidInput {
                index: Some(index),
                reason: format!("line {}: duration {}h is below 1 hour", index, self.duration_hours),
            });
        }
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(PricingError::InvalidInput {
                index: Some(index),
                reason: format!(
                    "line {}: quantity {} outside {}..={}",
                    index, self.quantity, MIN_QUANTITY, MAX_QUANTITY
                ),
            });
        }
        if self.line_total().is_none() {
            return Err(PricingError::InvalidInput {
                index: Some(index),
                reason: format!("line {}: total is too large", index),
            });
        }
        Ok(())
    }
}

/// Breakdown of a cart total in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingResult {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub service_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Errors raised by the pricing engine and the cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid input: {reason}")]
    InvalidInput { index: Option<usize>, reason: String },

    #[error("Coupon not found: {code}")]
    CouponNotFound { code: String },

    #[error("Invalid coupon {code}: {reason}")]
    InvalidCoupon { code: String, reason: String },

    #[error("Bike {bike_id} not found")]
    BikeNotFound { bike_id: i64 },

    #[error("Bike {bike_id} is currently {status}")]
    BikeUnavailable { bike_id: i64, status: BikeStatus },

    #[error("Bike {bike_id} is not in the cart")]
    NotInCart { bike_id: i64 },
}

impl PricingError {
    /// Shorthand for an input error not tied to a line item.
    pub fn invalid(reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            index: None,
            reason: reason.into(),
        }
    }

    /// Input error for an amount that does not fit in a `Decimal`.
    pub fn overflow(what: &str) -> Self {
        Self::invalid(format!("{} is too large", what))
    }
}
