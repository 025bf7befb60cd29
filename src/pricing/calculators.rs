//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no catalog or cache access.
//! All results are whole currency units.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coupons::{Coupon, CouponKind};
use super::models::{LineItem, PricingError, PricingResult};

/// Round to specified decimal places, halves away from zero.
///
/// Amounts in this crate are never negative, so this is plain half-up rounding.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use spingo_checkout::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(2390.4), 0), dec!(2390));
/// assert_eq!(round_money(dec!(1.235), 2), dec!(1.24));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn whole(amount: Decimal) -> Decimal {
    round_money(amount, 0)
}

/// Discount a coupon grants on `subtotal`, clamped to `subtotal`.
pub fn coupon_discount(subtotal: Decimal, coupon: Option<&Coupon>) -> Result<Decimal, PricingError> {
    let Some(coupon) = coupon else {
        return Ok(Decimal::ZERO);
    };

    let computed = match coupon.kind {
        // Divide first so a 100% coupon on a huge subtotal cannot overflow.
        CouponKind::Percentage => subtotal
            .checked_div(Decimal::from(100))
            .and_then(|per_cent| per_cent.checked_mul(coupon.amount))
            .map(whole)
            .ok_or_else(|| PricingError::overflow("discount"))?,
        CouponKind::Fixed => whole(coupon.amount),
    };

    Ok(computed.min(subtotal))
}

/// Price a set of line items.
///
/// ```text
/// subtotal = round(sum(unit_price * duration_hours * quantity))
/// tax      = round((subtotal - discount + service_fee) * tax_rate)
/// total    = subtotal - discount + service_fee + tax
/// ```
///
/// # Errors
/// `PricingError::InvalidInput` when a line item is out of bounds, when
/// the service fee or tax rate is negative, or when any amount overflows.
pub fn calculate(
    items: &[LineItem],
    coupon: Option<&Coupon>,
    service_fee: Decimal,
    tax_rate: Decimal,
) -> Result<PricingResult, PricingError> {
    let mut raw_subtotal = Decimal::ZERO;
    for (index, item) in items.iter().enumerate() {
        item.check(index)?;
        raw_subtotal = item
            .line_total()
            .and_then(|line| raw_subtotal.checked_add(line))
            .ok_or_else(|| PricingError::InvalidInput {
                index: Some(index),
                reason: format!("line {}: subtotal is too large", index),
            })?;
    }
    if service_fee < Decimal::ZERO {
        return Err(PricingError::invalid(format!(
            "service fee {} is negative",
            service_fee
        )));
    }
    if tax_rate < Decimal::ZERO {
        return Err(PricingError::invalid(format!(
            "tax rate {} is negative",
            tax_rate
        )));
    }

    let subtotal = whole(raw_subtotal);
    let discount = coupon_discount(subtotal, coupon)?;
    let service_fee = whole(service_fee);
    let taxable = (subtotal - discount)
        .checked_add(service_fee)
        .ok_or_else(|| PricingError::overflow("service fee"))?;
    let tax = taxable
        .checked_mul(tax_rate)
        .map(whole)
        .ok_or_else(|| PricingError::overflow("tax"))?;
    let total = taxable
        .checked_add(tax)
        .ok_or_else(|| PricingError::overflow("total"))?;

    Ok(PricingResult {
        subtotal,
        discount,
        service_fee,
        tax,
        total,
    })
}

/// Optional extras offered on the booking page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOn {
    Insurance,
    Helmet,
    Delivery,
}

impl AddOn {
    /// Flat price of the add-on for the whole booking.
    pub fn price(self) -> Decimal {
        match self {
            AddOn::Insurance => Decimal::from(500),
            AddOn::Helmet => Decimal::from(200),
            AddOn::Delivery => Decimal::from(300),
        }
    }
}

/// Result of a single-bike booking quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuote {
    pub base_price: Decimal,
    pub add_ons: Vec<AddOn>,
    pub add_ons_total: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub pickup_time: NaiveTime,
    pub drop_time: NaiveTime,
}

/// Quote a booking: hourly rate for the chosen duration plus add-ons, tax on top.
///
/// Each add-on is charged once no matter how often it appears in `add_ons`.
pub fn quote_booking(
    hourly_rate: Decimal,
    duration_hours: i32,
    add_ons: &[AddOn],
    pickup_time: NaiveTime,
    tax_rate: Decimal,
) -> Result<BookingQuote, PricingError> {
    if hourly_rate < Decimal::ZERO {
        return Err(PricingError::invalid(format!(
            "hourly rate {} is negative",
            hourly_rate
        )));
    }
    if duration_hours < 1 {
        return Err(PricingError::invalid(format!(
            "duration {}h is below 1 hour",
            duration_hours
        )));
    }
    if tax_rate < Decimal::ZERO {
        return Err(PricingError::invalid(format!(
            "tax rate {} is negative",
            tax_rate
        )));
    }

    let add_ons: Vec<AddOn> = add_ons.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    let base_price = hourly_rate
        .checked_mul(Decimal::from(duration_hours))
        .map(whole)
        .ok_or_else(|| PricingError::overflow("base price"))?;
    let add_ons_total: Decimal = add_ons.iter().map(|a| a.price()).sum();
    let subtotal = base_price
        .checked_add(add_ons_total)
        .ok_or_else(|| PricingError::overflow("booking subtotal"))?;
    let tax = subtotal
        .checked_mul(tax_rate)
        .map(whole)
        .ok_or_else(|| PricingError::overflow("tax"))?;
    let total = subtotal
        .checked_add(tax)
        .ok_or_else(|| PricingError::overflow("total"))?;

    Ok(BookingQuote {
        base_price,
        add_ons,
        add_ons_total,
        subtotal,
        tax,
        total,
        pickup_time,
        drop_time: drop_off_time(pickup_time, duration_hours),
    })
}

/// Time the bike is due back, wrapping past midnight.
pub fn drop_off_time(pickup_time: NaiveTime, duration_hours: i32) -> NaiveTime {
    let (drop, _) = pickup_time.overflowing_add_signed(Duration::hours(i64::from(duration_hours)));
    drop
}

/// Parse a `HH:MM` pickup slot.
pub fn parse_time_slot(slot: &str) -> Result<NaiveTime, PricingError> {
    NaiveTime::parse_from_str(slot.trim(), "%H:%M")
        .map_err(|_| PricingError::invalid(format!("time slot '{}' is not HH:MM", slot)))
}
