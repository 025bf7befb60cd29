//! Rental cart state.
//!
//! A `Cart` is a plain value owned by the caller: build it, mutate it, price it.
//! Quantities are always kept within `MIN_QUANTITY..=MAX_QUANTITY`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::Bike;
use crate::pricing::calculators::calculate;
use crate::pricing::coupons::{Coupon, CouponRegistry};
use crate::pricing::models::{LineItem, PricingError, PricingResult, MAX_QUANTITY, MIN_QUANTITY};

/// One bike in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub bike_id: i64,
    pub name: String,
    pub price_per_hour: Decimal,
    pub duration_hours: i32,
    pub quantity: i32,
}

impl CartItem {
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.price_per_hour, self.duration_hours, self.quantity)
    }

    /// Unrounded line total, `None` on overflow.
    pub fn total_price(&self) -> Option<Decimal> {
        self.line_item().line_total()
    }
}

fn clamp_quantity(quantity: i64) -> i32 {
    quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY)) as i32
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    applied_coupon: Option<Coupon>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bike for `duration_hours`. A bike already in the cart gets one
    /// more unit instead, up to `MAX_QUANTITY`.
    pub fn add(&mut self, bike: &Bike, duration_hours: i32) -> Result<(), PricingError> {
        if duration_hours < 1 {
            return Err(PricingError::invalid(format!(
                "duration {}h is below 1 hour",
                duration_hours
            )));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.bike_id == bike.id) {
            existing.quantity = clamp_quantity(i64::from(existing.quantity) + 1);
            return Ok(());
        }

        self.items.push(CartItem {
            bike_id: bike.id,
            name: bike.display_name(),
            price_per_hour: bike.price_per_hour,
            duration_hours,
            quantity: MIN_QUANTITY,
        });
        Ok(())
    }

    /// Set a quantity, clamped to the allowed range.
    pub fn set_quantity(&mut self, bike_id: i64, quantity: i32) -> Result<i32, PricingError> {
        let item = self.item_mut(bike_id)?;
        item.quantity = clamp_quantity(i64::from(quantity));
        Ok(item.quantity)
    }

    /// Step a quantity up or down, clamped to the allowed range.
    pub fn change_quantity(&mut self, bike_id: i64, delta: i32) -> Result<i32, PricingError> {
        let item = self.item_mut(bike_id)?;
        item.quantity = clamp_quantity(i64::from(item.quantity) + i64::from(delta));
        Ok(item.quantity)
    }

    pub fn remove(&mut self, bike_id: i64) -> Result<CartItem, PricingError> {
        let index = self
            .items
            .iter()
            .position(|i| i.bike_id == bike_id)
            .ok_or(PricingError::NotInCart { bike_id })?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply a coupon by code. An unknown code leaves the current coupon in place.
    pub fn apply_coupon(
        &mut self,
        code: &str,
        registry: &CouponRegistry,
    ) -> Result<&Coupon, PricingError> {
        let coupon = registry.lookup(code)?.clone();
        Ok(&*self.applied_coupon.insert(coupon))
    }

    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.applied_coupon.take()
    }

    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(CartItem::line_item).collect()
    }

    /// Price the cart with the applied coupon.
    pub fn pricing(&self, service_fee: Decimal, tax_rate: Decimal) -> Result<PricingResult, PricingError> {
        calculate(
            &self.line_items(),
            self.applied_coupon.as_ref(),
            service_fee,
            tax_rate,
        )
    }

    fn item_mut(&mut self, bike_id: i64) -> Result<&mut CartItem, PricingError> {
        self.items
            .iter_mut()
            .find(|i| i.bike_id == bike_id)
            .ok_or(PricingError::NotInCart { bike_id })
    }
}
