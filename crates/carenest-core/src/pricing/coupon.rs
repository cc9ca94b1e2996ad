//! Coupon codes and their discount rules.

use super::Rupees;
use serde::{Deserialize, Serialize};

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CouponRule {
    /// Percentage of the subtotal, rounded down.
    Percent(u8),
    /// Fixed amount off.
    Flat(Rupees),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub rule: CouponRule,
}

impl Coupon {
    pub fn percent(code: impl Into<String>, percent: u8) -> Self {
        Self {
            code: code.into(),
            rule: CouponRule::Percent(percent.min(100)),
        }
    }

    pub fn flat(code: impl Into<String>, amount: Rupees) -> Self {
        Self {
            code: code.into(),
            rule: CouponRule::Flat(amount),
        }
    }

    /// Discount this coupon grants on `subtotal`, never more than the
    /// subtotal itself.
    pub fn discount_on(&self, subtotal: Rupees) -> Rupees {
        let raw = match self.rule {
            CouponRule::Percent(pct) => {
                let scaled = u128::from(subtotal) * u128::from(pct.min(100)) / 100;
                Rupees::try_from(scaled).unwrap_or(subtotal)
            }
            CouponRule::Flat(amount) => amount,
        };
        raw.min(subtotal)
    }
}

/// The fixed enumeration of valid coupon codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Looks up a code by exact, case-insensitive match.
    pub fn resolve(&self, code: &str) -> Option<&Coupon> {
        self.coupons
            .iter()
            .find(|coupon| coupon.code.eq_ignore_ascii_case(code))
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.resolve(code).is_some()
    }

    /// Discount for `code` on `subtotal`. Unknown codes yield zero.
    pub fn discount_for(&self, code: &str, subtotal: Rupees) -> Rupees {
        self.resolve(code)
            .map(|coupon| coupon.discount_on(subtotal))
            .unwrap_or(0)
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::new(vec![
            Coupon::percent("HEALTH20", 20),
            Coupon::flat("FIRST10", 100),
            Coupon::flat("SAVE50", 50),
        ])
    }
}
