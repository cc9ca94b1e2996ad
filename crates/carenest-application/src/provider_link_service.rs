//! Provider link use case.
//!
//! Wraps `ProviderLinkRegistry` and keeps it in step with the auth session:
//! the registry is loaded when a user becomes known and cleared when the
//! user goes away.

use carenest_core::Result;
use carenest_core::auth::AuthProvider;
use carenest_core::provider_link::{
    KeyValueStore, LinkedProvider, ProviderLinkRegistry, ServiceType,
};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ProviderLinkService {
    auth: Arc<dyn AuthProvider>,
    registry: RwLock<ProviderLinkRegistry>,
}

impl ProviderLinkService {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth,
            registry: RwLock::new(ProviderLinkRegistry::new(store)),
        }
    }

    /// Aligns the registry with the current user: loads on a new user,
    /// clears when nobody is signed in, otherwise does nothing.
    pub async fn sync_with_session(&self) -> Result<()> {
        let current = self.auth.current_user().await.map(|user| user.id);
        let mut registry = self.registry.write().await;
        if registry.active_user() == current.as_ref() {
            return Ok(());
        }
        match current {
            Some(user_id) => registry.load_for(user_id).await,
            None => {
                registry.clear();
                Ok(())
            }
        }
    }

    /// Drops the in-memory view. Stored links are kept.
    pub async fn clear(&self) {
        self.registry.write().await.clear();
    }

    pub async fn link(&self, provider: LinkedProvider) -> Result<bool> {
        self.sync_with_session().await?;
        let id = provider.id.clone();
        let inserted = self.registry.write().await.link(provider).await?;
        if inserted {
            tracing::info!(provider_id = %id, "provider linked");
        }
        Ok(inserted)
    }

    pub async fn unlink(&self, provider_id: &str) -> Result<bool> {
        self.sync_with_session().await?;
        let removed = self.registry.write().await.unlink(provider_id).await?;
        if removed {
            tracing::info!(provider_id, "provider unlinked");
        }
        Ok(removed)
    }

    pub async fn is_linked(&self, provider_id: &str) -> Result<bool> {
        self.sync_with_session().await?;
        Ok(self.registry.read().await.is_linked(provider_id))
    }

    pub async fn by_type(&self, service_type: ServiceType) -> Result<Vec<LinkedProvider>> {
        self.sync_with_session().await?;
        Ok(self.registry.read().await.by_type(service_type))
    }

    pub async fn providers(&self) -> Result<Vec<LinkedProvider>> {
        self.sync_with_session().await?;
        Ok(self.registry.read().await.providers().to_vec())
    }
}
