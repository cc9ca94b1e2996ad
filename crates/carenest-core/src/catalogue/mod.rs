//! Catalogue domain module.
//!
//! Read-only lists of offerable entities (doctors, nurses, nursing services,
//! lab tests, pharmacies, medicines, caregivers, care packages).
//!
//! # Module Structure
//!
//! - `model`: `CatalogueItem`
//! - `provider`: `CatalogueProvider` trait
//! - `query`: client-side filtering and sorting (`CatalogueQuery`)

mod model;
mod provider;
mod query;

pub use model::{CatalogueItem, CatalogueKind};
pub use provider::CatalogueProvider;
pub use query::{CatalogueQuery, SortOrder};
