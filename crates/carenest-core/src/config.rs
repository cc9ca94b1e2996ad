//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section has
//! defaults, so an absent file or an absent section is valid.

use crate::booking::Vertical;
use crate::pricing::{Coupon, CouponBook, FeePolicy, PricingResolver};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PricingSettings {
    #[serde(default = "default_medicine_fee")]
    pub medicine_fee: FeePolicy,
    #[serde(default)]
    pub lab_fee: FeePolicy,
    #[serde(default = "default_coupons")]
    pub coupons: Vec<Coupon>,
}

fn default_medicine_fee() -> FeePolicy {
    FeePolicy::flat(40).waived_from(500)
}

fn default_coupons() -> Vec<Coupon> {
    CouponBook::default().coupons().to_vec()
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            medicine_fee: default_medicine_fee(),
            lab_fee: FeePolicy::free(),
            coupons: default_coupons(),
        }
    }
}

impl PricingSettings {
    pub fn fee_policy_for(&self, vertical: Vertical) -> FeePolicy {
        match vertical {
            Vertical::Medicine => self.medicine_fee,
            Vertical::Lab => self.lab_fee,
            _ => FeePolicy::free(),
        }
    }

    /// Builds the resolver a `SelectionFlow` for `vertical` should use.
    pub fn resolver_for(&self, vertical: Vertical) -> PricingResolver {
        PricingResolver::new(
            self.fee_policy_for(vertical),
            CouponBook::new(self.coupons.clone()),
        )
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::LineItem;
    use crate::pricing::{CouponRule, PricingMode};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.pricing.coupons.len(), 3);
    }

    #[test]
    fn test_medicine_resolver_charges_delivery() {
        let resolver = PricingSettings::default().resolver_for(Vertical::Medicine);
        let cart = vec![LineItem::new("para", "Paracetamol", 120)];
        let quote = resolver.compute_total(&cart, PricingMode::Unit, None);
        assert_eq!(quote.fee, 40);
        assert_eq!(quote.total, 160);
    }

    #[test]
    fn test_partial_pricing_section() {
        let doc = r#"
            [pricing.lab_fee]
            flat_fee = 60

            [[pricing.coupons]]
            code = "WELCOME"
            rule = { type = "flat", value = 75 }
        "#;
        let config: RootConfig = toml::from_str(doc).unwrap();
        assert_eq!(config.pricing.lab_fee.fee_for(300), 60);
        assert_eq!(config.pricing.medicine_fee, default_medicine_fee());
        assert_eq!(config.pricing.coupons.len(), 1);
        assert_eq!(config.pricing.coupons[0].rule, CouponRule::Flat(75));
        assert!(
            config
                .pricing
                .resolver_for(Vertical::Lab)
                .coupons()
                .is_valid("welcome")
        );
    }
}
