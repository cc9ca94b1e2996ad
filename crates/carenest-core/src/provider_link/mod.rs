//! Provider link registry.
//!
//! Per-user set of linked service providers kept in device-local storage.
//!
//! # Module Structure
//!
//! - `model`: `LinkedProvider`, `ServiceType`
//! - `store`: `KeyValueStore` trait (device storage seam)
//! - `registry`: `ProviderLinkRegistry`

mod model;
mod registry;
mod store;

pub use model::{LinkedProvider, ServiceType};
pub use registry::{ProviderLinkRegistry, storage_key};
pub use store::KeyValueStore;
