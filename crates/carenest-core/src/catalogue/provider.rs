//! Catalogue provider trait.

use super::model::CatalogueItem;
use crate::booking::Vertical;

/// Supplies the static catalogue for each vertical.
///
/// Lists are read-only and stable within a session. Availability filtering
/// happens here (via [`super::CatalogueQuery`]), never in the selection flow.
pub trait CatalogueProvider: Send + Sync {
    /// Returns every item offered in `vertical`, in catalogue order.
    fn list(&self, vertical: Vertical) -> Vec<CatalogueItem>;

    /// Looks up a single item by id within a vertical.
    fn find(&self, vertical: Vertical, id: &str) -> Option<CatalogueItem> {
        self.list(vertical).into_iter().find(|item| item.id == id)
    }
}
