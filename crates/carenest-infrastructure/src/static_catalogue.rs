//! Built-in catalogue data.

use carenest_core::booking::Vertical;
use carenest_core::catalogue::{CatalogueItem, CatalogueKind, CatalogueProvider};
use carenest_core::pricing::Rupees;

use CatalogueKind::{Package, Provider, Service};

/// Fixed, in-memory catalogue.
#[derive(Debug, Clone)]
pub struct StaticCatalogue {
    items: Vec<CatalogueItem>,
}

impl StaticCatalogue {
    pub fn from_items(items: Vec<CatalogueItem>) -> Self {
        Self { items }
    }

    /// The catalogue shipped with CareNest.
    pub fn builtin() -> Self {
        let mut items = Vec::new();
        items.extend(doctors());
        items.extend(home_visit_doctors());
        items.extend(lab_tests());
        items.extend(nurses());
        items.extend(nursing_services());
        items.extend(elderly_care());
        items.extend(pharmacies());
        items.extend(medicines());
        Self { items }
    }
}

impl Default for StaticCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogueProvider for StaticCatalogue {
    fn list(&self, vertical: Vertical) -> Vec<CatalogueItem> {
        self.items
            .iter()
            .filter(|item| item.vertical == vertical)
            .cloned()
            .collect()
    }
}

fn doctors() -> Vec<CatalogueItem> {
    let doctor = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::Doctor, Provider, name, price)
    };
    vec![
        doctor("doc-sharma", "Dr. Priya Sharma", 800)
            .with_specialization("Cardiologist")
            .with_qualification("MBBS, MD (Cardiology)")
            .with_experience(15)
            .with_rating(4.8)
            .with_languages(&["English", "Hindi"]),
        doctor("doc-mehta", "Dr. Rajesh Mehta", 500)
            .with_specialization("General Physician")
            .with_qualification("MBBS")
            .with_experience(10)
            .with_rating(4.6)
            .with_languages(&["English", "Hindi", "Gujarati"]),
        doctor("doc-iyer", "Dr. Lakshmi Iyer", 700)
            .with_discount_price(600)
            .with_specialization("Pediatrician")
            .with_qualification("MBBS, DCH")
            .with_experience(12)
            .with_rating(4.9)
            .with_languages(&["English", "Tamil"]),
        doctor("doc-khan", "Dr. Imran Khan", 900)
            .with_specialization("Dermatologist")
            .with_qualification("MBBS, MD (Dermatology)")
            .with_experience(8)
            .with_rating(4.5)
            .with_languages(&["English", "Hindi", "Urdu"]),
        doctor("doc-reddy", "Dr. Anil Reddy", 1000)
            .with_specialization("Orthopedic")
            .with_qualification("MBBS, MS (Ortho)")
            .with_experience(20)
            .with_rating(4.7)
            .with_languages(&["English", "Telugu"])
            .unavailable(),
    ]
}

fn home_visit_doctors() -> Vec<CatalogueItem> {
    let doctor = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::HomeVisit, Provider, name, price)
    };
    vec![
        doctor("hv-verma", "Dr. Sunil Verma", 1200)
            .with_specialization("General Physician")
            .with_qualification("MBBS")
            .with_experience(18)
            .with_rating(4.7)
            .with_languages(&["English", "Hindi"]),
        doctor("hv-das", "Dr. Meera Das", 1500)
            .with_discount_price(1299)
            .with_specialization("Geriatrician")
            .with_qualification("MBBS, MD (Geriatrics)")
            .with_experience(14)
            .with_rating(4.9)
            .with_languages(&["English", "Bengali"]),
        doctor("hv-pillai", "Dr. Arjun Pillai", 1000)
            .with_specialization("Physiotherapist")
            .with_qualification("BPT, MPT")
            .with_experience(7)
            .with_rating(4.4)
            .with_languages(&["English", "Malayalam"]),
    ]
}

fn lab_tests() -> Vec<CatalogueItem> {
    let test = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::Lab, Service, name, price)
    };
    vec![
        test("lab-cbc", "Complete Blood Count", 350).with_discount_price(299),
        test("lab-lipid", "Lipid Profile", 600).fasting(),
        test("lab-thyroid", "Thyroid Profile", 400),
        test("lab-hba1c", "HbA1c", 500).with_discount_price(449),
        test("lab-fbs", "Fasting Blood Sugar", 150).fasting(),
        test("lab-vitd", "Vitamin D", 1200).with_discount_price(999),
        test("lab-lft", "Liver Function Test", 700).fasting(),
        test("lab-kft", "Kidney Function Test", 650),
    ]
}

fn nurses() -> Vec<CatalogueItem> {
    let nurse = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::Nurse, Provider, name, price)
    };
    vec![
        nurse("nurse-anita", "Sister Anita Joseph", 299)
            .with_duration_prices(299, 1999)
            .with_specialization("ICU Care")
            .with_qualification("GNM")
            .with_experience(9)
            .with_rating(4.8)
            .with_languages(&["English", "Hindi", "Malayalam"]),
        nurse("nurse-kavita", "Kavita Rao", 249)
            .with_duration_prices(249, 1799)
            .with_specialization("Post-operative Care")
            .with_qualification("B.Sc Nursing")
            .with_experience(6)
            .with_rating(4.6)
            .with_languages(&["English", "Kannada"]),
        nurse("nurse-ramesh", "Ramesh Kumar", 199)
            .with_duration_prices(199, 1499)
            .with_specialization("Elderly Assistance")
            .with_qualification("ANM")
            .with_experience(4)
            .with_rating(4.3)
            .with_languages(&["Hindi"]),
    ]
}

fn nursing_services() -> Vec<CatalogueItem> {
    let service = |id: &str, name: &str, per_hour: Rupees, per_day: Rupees| {
        CatalogueItem::new(id, Vertical::Nurse, Service, name, per_hour)
            .with_duration_prices(per_hour, per_day)
    };
    vec![
        service("svc-injections", "Injections", 299, 1999),
        service("svc-wound", "Wound Dressing", 349, 2299),
        service("svc-catheter", "Catheter Care", 399, 2599),
        service("svc-postop", "Post-operative Care", 449, 2999),
        service("svc-vitals", "Vitals Monitoring", 199, 1499),
    ]
}

fn elderly_care() -> Vec<CatalogueItem> {
    let package = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::ElderlyCare, Package, name, price)
    };
    vec![
        package("care-companion", "Companion Care", 15000)
            .with_specialization("Daily companionship and assistance")
            .with_rating(4.7),
        package("care-assisted", "Assisted Living Support", 25000)
            .with_discount_price(22500)
            .with_specialization("Personal care, mobility and medication")
            .with_rating(4.8),
        package("care-dementia", "Dementia Care", 35000)
            .with_specialization("Trained caregivers for memory care")
            .with_rating(4.9),
        CatalogueItem::new(
            "caregiver-sunita",
            Vertical::ElderlyCare,
            Provider,
            "Sunita Devi",
            18000,
        )
        .with_specialization("Live-in caregiver")
        .with_experience(11)
        .with_rating(4.6)
        .with_languages(&["Hindi", "Punjabi"]),
    ]
}

fn pharmacies() -> Vec<CatalogueItem> {
    // Pharmacies carry no price of their own; the cart is priced.
    let pharmacy = |id: &str, name: &str| {
        CatalogueItem::new(id, Vertical::Medicine, Provider, name, 0)
    };
    vec![
        pharmacy("pharm-apollo", "Apollo Pharmacy").with_rating(4.6),
        pharmacy("pharm-medplus", "MedPlus").with_rating(4.4),
        pharmacy("pharm-wellness", "Wellness Forever")
            .with_rating(4.2)
            .unavailable(),
    ]
}

fn medicines() -> Vec<CatalogueItem> {
    let medicine = |id: &str, name: &str, price: Rupees| {
        CatalogueItem::new(id, Vertical::Medicine, Service, name, price)
    };
    vec![
        medicine("med-paracetamol", "Paracetamol 500mg (15 tabs)", 30),
        medicine("med-azithro", "Azithromycin 500mg (3 tabs)", 120).with_discount_price(99),
        medicine("med-ors", "ORS Sachet", 25),
        medicine("med-cetirizine", "Cetirizine 10mg (10 tabs)", 45),
        medicine("med-vitc", "Vitamin C 500mg (30 tabs)", 250).with_discount_price(199),
        medicine("med-metformin", "Metformin 500mg (20 tabs)", 80),
        medicine("med-bp-monitor", "Digital BP Monitor", 1800).with_discount_price(1499),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use carenest_core::catalogue::{CatalogueQuery, SortOrder};
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_vertical_has_items_and_unique_ids() {
        let catalogue = StaticCatalogue::builtin();
        let mut ids = std::collections::HashSet::new();
        for vertical in Vertical::iter() {
            let items = catalogue.list(vertical);
            assert!(!items.is_empty(), "{} is empty", vertical);
            for item in items {
                assert_eq!(item.vertical, vertical);
                assert!(ids.insert(item.id), "duplicate id");
            }
        }
    }

    #[test]
    fn test_nursing_injections_priced_hourly() {
        let catalogue = StaticCatalogue::builtin();
        let injections = catalogue.find(Vertical::Nurse, "svc-injections").unwrap();
        assert_eq!(injections.price_per_hour, Some(299));
    }

    #[test]
    fn test_available_doctors_by_rating() {
        let doctors = CatalogueQuery::new()
            .available_only()
            .sort(SortOrder::Rating)
            .apply(StaticCatalogue::builtin().list(Vertical::Doctor));
        assert_eq!(doctors[0].id, "doc-iyer");
        assert!(doctors.iter().all(|d| d.available));
    }
}
