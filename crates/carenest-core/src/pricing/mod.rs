//! Pricing resolver.
//!
//! Pure, side-effect-free computation of a booking total from line items,
//! a pricing mode, a vertical's fee policy and an optional coupon code.
//!
//! All amounts are whole rupees held as unsigned integers. The catalogue
//! has no fractional prices, and percentage discounts round down.

mod coupon;
mod fee;
mod resolver;

pub use coupon::{Coupon, CouponBook, CouponRule};
pub use fee::FeePolicy;
pub use resolver::{PriceBreakdown, PricingMode, PricingResolver};

/// Whole-rupee amount.
pub type Rupees = u64;
