//! Pricing engine module for SpinGo checkout.
//!
//! Cart totals with coupons, service fee and GST, plus single-booking quotes.
//! The math lives in `calculators` and has no I/O; `services` and `routes`
//! wire it to the bike catalog and the HTTP API.

pub mod calculators;
pub mod coupons;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate, quote_booking, round_money, AddOn, BookingQuote};
pub use coupons::{Coupon, CouponKind, CouponRegistry};
pub use models::{LineItem, PricingError, PricingResult};
pub use routes::router;
