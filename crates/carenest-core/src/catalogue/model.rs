//! Catalogue item model.

use crate::booking::{LineItem, Vertical};
use crate::pricing::Rupees;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What a catalogue item represents inside its vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CatalogueKind {
    /// A bookable provider (doctor, nurse, caregiver, pharmacy).
    Provider,
    /// A selectable add-on (nursing service, lab test, medicine).
    Service,
    /// A bundled offering priced as a whole (elderly-care package).
    Package,
}

/// A static, read-only entry supplied by the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    pub id: String,
    pub vertical: Vertical,
    pub kind: CatalogueKind,
    pub name: String,
    /// Base price in whole rupees.
    pub price: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Lab tests only: the patient must fast before sample collection.
    #[serde(default)]
    pub fasting_required: bool,
}

fn default_available() -> bool {
    true
}

impl CatalogueItem {
    /// Creates an available item with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        vertical: Vertical,
        kind: CatalogueKind,
        name: impl Into<String>,
        price: Rupees,
    ) -> Self {
        Self {
            id: id.into(),
            vertical,
            kind,
            name: name.into(),
            price,
            discount_price: None,
            price_per_hour: None,
            price_per_day: None,
            rating: None,
            specialization: None,
            qualification: None,
            experience_years: None,
            available: true,
            languages: Vec::new(),
            fasting_required: false,
        }
    }

    pub fn with_discount_price(mut self, discount_price: Rupees) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    pub fn with_duration_prices(mut self, per_hour: Rupees, per_day: Rupees) -> Self {
        self.price_per_hour = Some(per_hour);
        self.price_per_day = Some(per_day);
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualification = Some(qualification.into());
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = Some(years);
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn fasting(mut self) -> Self {
        self.fasting_required = true;
        self
    }

    /// The price a customer actually pays per unit: discount wins over base.
    pub fn effective_price(&self) -> Rupees {
        self.discount_price.unwrap_or(self.price)
    }

    /// Converts this item into a draft line item of the given quantity.
    pub fn to_line_item(&self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            discount_price: self.discount_price,
            price_per_hour: self.price_per_hour,
            price_per_day: self.price_per_day,
            quantity: quantity.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_prefers_discount() {
        let item = CatalogueItem::new("t1", Vertical::Lab, CatalogueKind::Service, "CBC", 200)
            .with_discount_price(150);
        assert_eq!(item.effective_price(), 150);
    }

    #[test]
    fn test_to_line_item_clamps_quantity() {
        let item = CatalogueItem::new("m1", Vertical::Medicine, CatalogueKind::Service, "ORS", 25);
        assert_eq!(item.to_line_item(0).quantity, 1);
        assert_eq!(item.to_line_item(3).quantity, 3);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"d1","vertical":"doctor","kind":"provider","name":"Dr. Rao","price":500}"#;
        let item: CatalogueItem = serde_json::from_str(json).unwrap();
        assert!(item.available);
        assert!(item.languages.is_empty());
        assert_eq!(item.discount_price, None);
    }
}
