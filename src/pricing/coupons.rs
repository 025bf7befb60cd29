//! Coupon codes and their discount rules.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::PricingError;

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// `amount` percent of the subtotal, 0..=100.
    Percentage,
    /// Flat `amount` off, never more than the subtotal.
    Fixed,
}

/// A named discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coupon {
    pub code: String,
    pub name: String,
    pub kind: CouponKind,
    pub amount: Decimal,
}

impl Coupon {
    /// Percentage coupon. Fails unless `percent` is within 0..=100.
    pub fn percentage(code: &str, name: &str, percent: Decimal) -> Result<Self, PricingError> {
        if percent < Decimal::ZERO || percent > Decimal::from(100) {
            return Err(PricingError::InvalidCoupon {
                code: code.to_string(),
                reason: format!("percentage {} outside 0..=100", percent),
            });
        }
        Ok(Self::build(code, name, CouponKind::Percentage, percent))
    }

    /// Fixed-amount coupon. Fails if `amount` is negative.
    pub fn fixed(code: &str, name: &str, amount: Decimal) -> Result<Self, PricingError> {
        if amount < Decimal::ZERO {
            return Err(PricingError::InvalidCoupon {
                code: code.to_string(),
                reason: format!("fixed amount {} is negative", amount),
            });
        }
        Ok(Self::build(code, name, CouponKind::Fixed, amount))
    }

    fn build(code: &str, name: &str, kind: CouponKind, amount: Decimal) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            name: name.to_string(),
            kind,
            amount,
        }
    }
}

/// Fixed table of coupons offered at checkout.
#[derive(Debug, Clone)]
pub struct CouponRegistry {
    coupons: Vec<Coupon>,
}

impl CouponRegistry {
    /// Registry with the checkout coupons: WELCOME10, SAVE500 and BIKE20.
    pub fn new() -> Self {
        let coupons = vec![
            Coupon::build("WELCOME10", "Welcome Discount", CouponKind::Percentage, Decimal::from(10)),
            Coupon::build("SAVE500", "Save ₹500", CouponKind::Fixed, Decimal::from(500)),
            Coupon::build("BIKE20", "Bike Lover Special", CouponKind::Percentage, Decimal::from(20)),
        ];
        Self { coupons }
    }

    /// Find a coupon by code, ignoring case and surrounding whitespace.
    pub fn lookup(&self, code: &str) -> Result<&Coupon, PricingError> {
        let wanted = code.trim();
        self.coupons
            .iter()
            .find(|c| !wanted.is_empty() && c.code.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PricingError::CouponNotFound {
                code: wanted.to_string(),
            })
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }
}

impl Default for CouponRegistry {
    fn default() -> Self {
        Self::new()
    }
}
