//! Client-side filtering and sorting over catalogue lists.

use super::model::{CatalogueItem, CatalogueKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Keep catalogue order.
    #[default]
    Catalogue,
    /// Highest rating first; unrated items last.
    Rating,
    PriceLowToHigh,
    PriceHighToLow,
    Name,
}

/// Filter and sort options for a catalogue listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogueQuery {
    /// Case-insensitive substring matched against name, specialization,
    /// qualification and languages.
    pub search: Option<String>,
    /// Exact (case-insensitive) specialization match.
    pub specialization: Option<String>,
    pub kind: Option<CatalogueKind>,
    pub available_only: bool,
    pub sort: SortOrder,
}

impl CatalogueQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    pub fn kind(mut self, kind: CatalogueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, item: &CatalogueItem) -> bool {
        if self.available_only && !item.available {
            return false;
        }
        if let Some(kind) = self.kind {
            if item.kind != kind {
                return false;
            }
        }
        if let Some(wanted) = &self.specialization {
            match &item.specialization {
                Some(spec) if spec.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }
        if let Some(text) = &self.search {
            let needle = text.trim().to_lowercase();
            if needle.is_empty() {
                return true;
            }
            let contains = |value: &str| value.to_lowercase().contains(&needle);
            return contains(&item.name)
                || item.specialization.as_deref().is_some_and(contains)
                || item.qualification.as_deref().is_some_and(contains)
                || item.languages.iter().any(|l| contains(l));
        }
        true
    }

    /// Filters then sorts. Sorting is stable so ties keep catalogue order.
    pub fn apply(&self, items: Vec<CatalogueItem>) -> Vec<CatalogueItem> {
        let mut filtered: Vec<CatalogueItem> =
            items.into_iter().filter(|item| self.matches(item)).collect();

        match self.sort {
            SortOrder::Catalogue => {}
            SortOrder::Rating => filtered.sort_by(|a, b| compare_rating_desc(a.rating, b.rating)),
            SortOrder::PriceLowToHigh => filtered.sort_by_key(|item| item.effective_price()),
            SortOrder::PriceHighToLow => {
                filtered.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()))
            }
            SortOrder::Name => {
                filtered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }

        filtered
    }
}

fn compare_rating_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Vertical;

    fn doctors() -> Vec<CatalogueItem> {
        vec![
            CatalogueItem::new("d1", Vertical::Doctor, CatalogueKind::Provider, "Dr. Mehta", 800)
                .with_specialization("Cardiologist")
                .with_rating(4.6)
                .with_languages(&["English", "Hindi"]),
            CatalogueItem::new("d2", Vertical::Doctor, CatalogueKind::Provider, "Dr. Iyer", 500)
                .with_specialization("Pediatrician")
                .with_rating(4.9)
                .with_languages(&["Tamil"])
                .unavailable(),
            CatalogueItem::new("d3", Vertical::Doctor, CatalogueKind::Provider, "Dr. Bose", 600)
                .with_specialization("cardiologist")
                .with_discount_price(450),
        ]
    }

    #[test]
    fn test_search_matches_languages_and_specialization() {
        let found = CatalogueQuery::new().search("tamil").apply(doctors());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "d2");

        let found = CatalogueQuery::new().search("CARDIO").apply(doctors());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_available_only_and_specialization() {
        let found = CatalogueQuery::new()
            .specialization("Cardiologist")
            .available_only()
            .apply(doctors());
        let ids: Vec<_> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d3"]);
    }

    #[test]
    fn test_sorting() {
        let by_rating = CatalogueQuery::new().sort(SortOrder::Rating).apply(doctors());
        let ids: Vec<_> = by_rating.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d1", "d3"]);

        let by_price = CatalogueQuery::new()
            .sort(SortOrder::PriceLowToHigh)
            .apply(doctors());
        let ids: Vec<_> = by_price.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d3", "d2", "d1"]);
    }
}
