//! Pricing service functions with catalog access.
//!
//! These functions resolve bikes and coupons, then hand off to the pure
//! calculators.

use rust_decimal::Decimal;

use crate::cache::AppCache;
use crate::cart::Cart;
use crate::catalog::BikeCatalog;
use crate::error::Result;

use super::calculators::{self, AddOn, BookingQuote};
use super::coupons::{Coupon, CouponRegistry};
use super::models::{LineItem, PricingError, PricingResult, MAX_QUANTITY};
use super::requests::CartLineRequest;

/// Message shown when a coupon code is not applied.
pub const INVALID_COUPON_MESSAGE: &str = "Invalid coupon code";

/// Outcome of resolving an optional coupon code.
#[derive(Debug, Clone, Default)]
pub struct CouponResolution<'a> {
    pub coupon: Option<&'a Coupon>,
    /// User-facing message when a code was given but not applied
    pub message: Option<String>,
}

/// Look up a coupon code. Unknown codes are not an error here: pricing goes
/// ahead with no discount and the caller shows `message`.
pub fn resolve_coupon<'a>(registry: &'a CouponRegistry, code: Option<&str>) -> CouponResolution<'a> {
    let Some(code) = code.filter(|c| !c.trim().is_empty()) else {
        return CouponResolution::default();
    };

    match registry.lookup(code) {
        Ok(coupon) => CouponResolution {
            coupon: Some(coupon),
            message: None,
        },
        Err(e) => {
            tracing::info!("Coupon rejected: {}", e);
            CouponResolution {
                coupon: None,
                message: Some(INVALID_COUPON_MESSAGE.to_string()),
            }
        }
    }
}

/// Result of pricing raw line items
#[derive(Debug, Clone)]
pub struct ItemsQuote<'a> {
    pub pricing: PricingResult,
    pub coupon: CouponResolution<'a>,
}

/// Price raw line items with an optional coupon code.
pub fn quote_items<'a>(
    registry: &'a CouponRegistry,
    items: &[LineItem],
    coupon_code: Option<&str>,
    service_fee: Decimal,
    tax_rate: Decimal,
) -> Result<ItemsQuote<'a>> {
    let coupon = resolve_coupon(registry, coupon_code);
    let pricing = calculators::calculate(items, coupon.coupon, service_fee, tax_rate)?;
    Ok(ItemsQuote { pricing, coupon })
}

/// Result of pricing a cart of catalog bikes
#[derive(Debug, Clone)]
pub struct CartQuote {
    pub cart: Cart,
    pub pricing: PricingResult,
    pub coupon_message: Option<String>,
}

/// Build a cart from catalog bikes and price it.
///
/// Lines naming the same bike are merged when they share a duration. A line
/// that asks for a different duration, or that pushes the merged quantity
/// past `MAX_QUANTITY`, is rejected with its index.
pub async fn quote_cart(
    catalog: &BikeCatalog,
    cache: &AppCache,
    registry: &CouponRegistry,
    lines: &[CartLineRequest],
    coupon_code: Option<&str>,
    service_fee: Decimal,
    tax_rate: Decimal,
) -> Result<CartQuote> {
    let mut cart = Cart::new();

    for (index, line) in lines.iter().enumerate() {
        let bike = catalog.find_available_bike(cache, line.bike_id).await?;
        LineItem::new(bike.price_per_hour, line.duration_hours, line.quantity).check(index)?;

        let existing = cart
            .items()
            .iter()
            .find(|i| i.bike_id == bike.id)
            .map(|i| (i.duration_hours, i.quantity));

        match existing {
            Some((duration_hours, _)) if duration_hours != line.duration_hours => {
                return Err(PricingError::InvalidInput {
                    index: Some(index),
                    reason: format!(
                        "line {}: bike {} is already in the cart for {}h, not {}h",
                        index, bike.id, duration_hours, line.duration_hours
                    ),
                }
                .into());
            }
            Some((_, quantity)) => {
                let merged = quantity + line.quantity;
                if merged > MAX_QUANTITY {
                    return Err(PricingError::InvalidInput {
                        index: Some(index),
                        reason: format!(
                            "line {}: bike {} quantity {} exceeds {}",
                            index, bike.id, merged, MAX_QUANTITY
                        ),
                    }
                    .into());
                }
                cart.set_quantity(bike.id, merged)?;
            }
            None => {
                cart.add(&bike, line.duration_hours)?;
                cart.set_quantity(bike.id, line.quantity)?;
            }
        }
    }

    let resolution = resolve_coupon(registry, coupon_code);
    if let Some(coupon) = resolution.coupon {
        cart.apply_coupon(&coupon.code, registry)?;
    }

    let pricing = cart.pricing(service_fee, tax_rate)?;
    tracing::debug!(
        "Cart quote: {} lines, subtotal {}, total {}",
        cart.len(),
        pricing.subtotal,
        pricing.total
    );

    Ok(CartQuote {
        cart,
        pricing,
        coupon_message: resolution.message,
    })
}

/// Quote a booking, using the bike's hourly price when a bike is given and
/// `default_hourly_rate` otherwise.
#[allow(clippy::too_many_arguments)]
pub async fn quote_booking(
    catalog: &BikeCatalog,
    cache: &AppCache,
    bike_id: Option<i64>,
    default_hourly_rate: Decimal,
    duration_hours: i32,
    time_slot: &str,
    add_ons: &[AddOn],
    tax_rate: Decimal,
) -> Result<BookingQuote> {
    let hourly_rate = match bike_id {
        Some(id) => catalog.find_available_bike(cache, id).await?.price_per_hour,
        None => default_hourly_rate,
    };
    let pickup = calculators::parse_time_slot(time_slot)?;

    Ok(calculators::quote_booking(
        hourly_rate,
        duration_hours,
        add_ons,
        pickup,
        tax_rate,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Bike, BikeStatus, BikeType};
    use crate::error::AppError;
    use rust_decimal_macros::dec;

    fn catalog() -> BikeCatalog {
        BikeCatalog::fixture(vec![
            Bike {
                id: 1,
                brand: "Honda".to_string(),
                model: "CBR600RR".to_string(),
                year: 2023,
                bike_type: BikeType::Standard,
                city: "Bengaluru".to_string(),
                price_per_hour: dec!(1660),
                status: BikeStatus::Available,
            },
            Bike {
                id: 4,
                brand: "Ducati".to_string(),
                model: "Monster 821".to_string(),
                year: 2022,
                bike_type: BikeType::Standard,
                city: "Pune".to_string(),
                price_per_hour: dec!(2490),
                status: BikeStatus::Available,
            },
            Bike {
                id: 6,
                brand: "Royal Enfield".to_string(),
                model: "Classic 350".to_string(),
                year: 2021,
                bike_type: BikeType::Cruiser,
                city: "Jaipur".to_string(),
                price_per_hour: dec!(450),
                status: BikeStatus::Booked,
            },
        ])
    }

    fn line(bike_id: i64, duration_hours: i32, quantity: i32) -> CartLineRequest {
        CartLineRequest {
            bike_id,
            duration_hours,
            quantity,
        }
    }

    #[test]
    fn test_resolve_coupon() {
        let registry = CouponRegistry::new();

        let none = resolve_coupon(&registry, None);
        assert!(none.coupon.is_none() && none.message.is_none());

        let blank = resolve_coupon(&registry, Some("  "));
        assert!(blank.coupon.is_none() && blank.message.is_none());

        let bad = resolve_coupon(&registry, Some("FREEBIE"));
        assert!(bad.coupon.is_none());
        assert_eq!(bad.message.as_deref(), Some(INVALID_COUPON_MESSAGE));

        let good = resolve_coupon(&registry, Some("bike20"));
        assert_eq!(good.coupon.unwrap().code, "BIKE20");
    }

    #[test]
    fn test_quote_items_unknown_coupon_prices_without_discount() {
        let registry = CouponRegistry::new();
        let items = vec![LineItem::new(dec!(1660), 8, 1)];

        let quote = quote_items(&registry, &items, Some("NOPE"), dec!(500), dec!(0.18)).unwrap();

        assert_eq!(quote.pricing.discount, dec!(0));
        assert_eq!(quote.pricing.total, dec!(16260));
        assert!(quote.coupon.message.is_some());
    }

    #[tokio::test]
    async fn test_quote_cart() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let quote = quote_cart(
            &catalog(),
            &cache,
            &registry,
            &[line(1, 8, 1)],
            Some("SAVE500"),
            dec!(500),
            dec!(0.18),
        )
        .await
        .unwrap();

        assert_eq!(quote.cart.len(), 1);
        assert_eq!(quote.pricing.subtotal, dec!(13280));
        assert_eq!(quote.pricing.total, dec!(15670));
        assert!(quote.coupon_message.is_none());
    }

    #[tokio::test]
    async fn test_quote_cart_merges_duplicate_bikes() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let quote = quote_cart(
            &catalog(),
            &cache,
            &registry,
            &[line(4, 2, 2), line(1, 8, 1), line(4, 2, 3)],
            None,
            dec!(0),
            dec!(0),
        )
        .await
        .unwrap();

        assert_eq!(quote.cart.len(), 2);
        assert_eq!(quote.cart.items()[0].quantity, 5);
        // 2490 * 2h * 5 + 1660 * 8h
        assert_eq!(quote.pricing.subtotal, dec!(38180));
    }

    #[tokio::test]
    async fn test_quote_cart_rejects_merged_quantity_over_max() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let err = quote_cart(
            &catalog(),
            &cache,
            &registry,
            &[line(4, 2, 2), line(4, 2, 2), line(4, 2, 3)],
            None,
            dec!(0),
            dec!(0),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pricing(PricingError::InvalidInput { index: Some(2), .. })
        ));
    }

    #[tokio::test]
    async fn test_quote_cart_rejects_conflicting_durations() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let err = quote_cart(
            &catalog(),
            &cache,
            &registry,
            &[line(4, 2, 2), line(4, 8, 1)],
            None,
            dec!(0),
            dec!(0),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pricing(PricingError::InvalidInput { index: Some(1), .. })
        ));
        assert!(err.to_string().contains("already in the cart for 2h"));
    }

    #[tokio::test]
    async fn test_quote_rejects_unavailable_bike() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let err = quote_cart(&catalog(), &cache, &registry, &[line(6, 2, 1)], None, dec!(0), dec!(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::BikeUnavailable { bike_id: 6, .. })
        ));

        let err = quote_booking(&catalog(), &cache, Some(6), dec!(500), 2, "10:00", &[], dec!(0.18))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::BikeUnavailable { bike_id: 6, .. })
        ));
    }

    #[tokio::test]
    async fn test_quote_cart_rejects_bad_lines() {
        let cache = AppCache::new();
        let registry = CouponRegistry::new();

        let err = quote_cart(&catalog(), &cache, &registry, &[line(1, 8, 6)], None, dec!(500), dec!(0.18))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::InvalidInput { index: Some(0), .. })
        ));

        let err = quote_cart(&catalog(), &cache, &registry, &[line(99, 8, 1)], None, dec!(500), dec!(0.18))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::BikeNotFound { bike_id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_quote_booking_uses_bike_rate() {
        let cache = AppCache::new();

        let flat = quote_booking(&catalog(), &cache, None, dec!(500), 2, "10:00", &[], dec!(0.18))
            .await
            .unwrap();
        assert_eq!(flat.base_price, dec!(1000));

        let bike = quote_booking(&catalog(), &cache, Some(4), dec!(500), 2, "10:00", &[], dec!(0.18))
            .await
            .unwrap();
        assert_eq!(bike.base_price, dec!(4980));

        let err = quote_booking(&catalog(), &cache, None, dec!(500), 2, "ten", &[], dec!(0.18))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Pricing(PricingError::InvalidInput { .. })));
    }
}
