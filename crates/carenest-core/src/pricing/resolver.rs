use super::{CouponBook, FeePolicy, Rupees};
use crate::booking::{BookingMode, LineItem};
use serde::{Deserialize, Serialize};

/// How line items are scaled when summing the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "units", rename_all = "snake_case")]
pub enum PricingMode {
    /// Per unit, scaled by quantity (medicine cart, lab tests, visits).
    #[default]
    Unit,
    /// `price_per_hour × hours`.
    Hourly(u32),
    /// `price_per_day × days`.
    Daily(u32),
}

impl PricingMode {
    /// Maps a booking mode and its duration onto a pricing mode. Modes that
    /// are not duration-based price per unit.
    pub fn from_booking_mode(mode: Option<BookingMode>, duration: u32) -> Self {
        match mode {
            Some(BookingMode::Hourly) => PricingMode::Hourly(duration),
            Some(BookingMode::Daily) => PricingMode::Daily(duration),
            _ => PricingMode::Unit,
        }
    }
}

/// Result of pricing a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Rupees,
    pub fee: Rupees,
    pub discount: Rupees,
    pub total: Rupees,
}

/// Computes totals for one vertical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingResolver {
    fee_policy: FeePolicy,
    coupons: CouponBook,
}

impl PricingResolver {
    pub fn new(fee_policy: FeePolicy, coupons: CouponBook) -> Self {
        Self {
            fee_policy,
            coupons,
        }
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee_policy
    }

    pub fn coupons(&self) -> &CouponBook {
        &self.coupons
    }

    /// Price contribution of one line item under `mode`.
    ///
    /// The discount price, when present, always wins over the base price.
    /// Duration modes use the item's per-hour or per-day rate and fall back
    /// to the effective unit price when the item has no such rate.
    pub fn line_amount(item: &LineItem, mode: PricingMode) -> Rupees {
        let quantity = Rupees::from(item.quantity.max(1));
        let unit = item.effective_price();
        match mode {
            PricingMode::Unit => unit.saturating_mul(quantity),
            PricingMode::Hourly(hours) => item
                .price_per_hour
                .unwrap_or(unit)
                .saturating_mul(Rupees::from(hours))
                .saturating_mul(quantity),
            PricingMode::Daily(days) => item
                .price_per_day
                .unwrap_or(unit)
                .saturating_mul(Rupees::from(days))
                .saturating_mul(quantity),
        }
    }

    /// `subtotal + fee - discount`, floored at zero. Amounts saturate at
    /// `Rupees::MAX`.
    ///
    /// An unrecognised coupon contributes no discount and is not an error.
    pub fn compute_total(
        &self,
        line_items: &[LineItem],
        mode: PricingMode,
        coupon_code: Option<&str>,
    ) -> PriceBreakdown {
        let subtotal = line_items
            .iter()
            .map(|item| Self::line_amount(item, mode))
            .fold(0, Rupees::saturating_add);
        let fee = self.fee_policy.fee_for(subtotal);
        let discount = coupon_code
            .map(|code| self.coupons.discount_for(code, subtotal))
            .unwrap_or(0);
        let total = subtotal.saturating_add(fee).saturating_sub(discount);

        PriceBreakdown {
            subtotal,
            fee,
            discount,
            total,
        }
    }
}

impl Default for PricingResolver {
    fn default() -> Self {
        Self::new(FeePolicy::free(), CouponBook::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: Rupees) -> LineItem {
        LineItem::new(id, id, price)
    }

    #[test]
    fn test_discount_price_takes_precedence() {
        let resolver = PricingResolver::default();
        let items = vec![item("cbc", 200).with_discount_price(150)];
        let quote = resolver.compute_total(&items, PricingMode::Unit, None);
        assert_eq!(quote.subtotal, 150);
        assert_eq!(quote.total, 150);
    }

    #[test]
    fn test_quantity_scales_unit_price() {
        let resolver = PricingResolver::default();
        let items = vec![item("ors", 25).with_quantity(4), item("dolo", 30)];
        let quote = resolver.compute_total(&items, PricingMode::Unit, None);
        assert_eq!(quote.subtotal, 130);
    }

    #[test]
    fn test_hourly_and_daily_rates() {
        let resolver = PricingResolver::default();
        let items = vec![item("inj", 0).with_duration_prices(299, 1999)];
        assert_eq!(
            resolver
                .compute_total(&items, PricingMode::Hourly(3), None)
                .subtotal,
            897
        );
        assert_eq!(
            resolver
                .compute_total(&items, PricingMode::Daily(2), None)
                .subtotal,
            3998
        );
    }

    #[test]
    fn test_medicine_fee_threshold() {
        let resolver = PricingResolver::new(FeePolicy::flat(40).waived_from(500), CouponBook::default());
        let below = resolver.compute_total(&[item("a", 499)], PricingMode::Unit, None);
        assert_eq!(below.fee, 40);
        assert_eq!(below.total, 539);
        let at = resolver.compute_total(&[item("a", 500)], PricingMode::Unit, None);
        assert_eq!(at.fee, 0);
        assert_eq!(at.total, 500);
    }

    #[test]
    fn test_coupon_application_is_idempotent() {
        let resolver = PricingResolver::default();
        let items = vec![item("a", 1000)];
        let once = resolver.compute_total(&items, PricingMode::Unit, Some("FIRST10"));
        let twice = resolver.compute_total(&items, PricingMode::Unit, Some("FIRST10"));
        assert_eq!(once, twice);
        assert_eq!(once.discount, 100);
    }

    #[test]
    fn test_unknown_coupon_is_silently_ignored() {
        let resolver = PricingResolver::default();
        let quote = resolver.compute_total(&[item("a", 300)], PricingMode::Unit, Some("BOGUSCODE"));
        assert_eq!(quote.discount, 0);
        assert_eq!(quote.total, 300);
    }

    #[test]
    fn test_lab_percent_coupon() {
        let resolver = PricingResolver::new(FeePolicy::free(), CouponBook::default());
        let items = vec![item("lipid", 600), item("thyroid", 400)];
        let quote = resolver.compute_total(&items, PricingMode::Unit, Some("HEALTH20"));
        assert_eq!(
            quote,
            PriceBreakdown {
                subtotal: 1000,
                fee: 0,
                discount: 200,
                total: 800
            }
        );
    }

    #[test]
    fn test_total_never_negative() {
        let resolver = PricingResolver::default();
        let quote = resolver.compute_total(&[item("a", 30)], PricingMode::Unit, Some("FIRST10"));
        assert_eq!(quote.discount, 30);
        assert_eq!(quote.total, 0);
    }
}
