use super::model::{LinkedProvider, ServiceType};
use super::store::KeyValueStore;
use crate::auth::UserId;
use crate::error::{CareNestError, Result};
use std::sync::Arc;

/// Storage key holding a user's linked providers as a JSON array.
pub fn storage_key(user_id: &UserId) -> String {
    format!("patient_providers_{}", user_id)
}

/// Deduplicated set of linked providers for the active user.
///
/// Loaded once when the user becomes known, written back on every mutation,
/// and cleared from memory (not from storage) on sign-out.
pub struct ProviderLinkRegistry {
    store: Arc<dyn KeyValueStore>,
    user_id: Option<UserId>,
    providers: Vec<LinkedProvider>,
}

impl ProviderLinkRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            user_id: None,
            providers: Vec::new(),
        }
    }

    pub fn active_user(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Loads the stored set for `user_id`, replacing the in-memory view.
    ///
    /// Unreadable stored data is logged and treated as an empty set; it is
    /// only overwritten by the next mutation.
    pub async fn load_for(&mut self, user_id: UserId) -> Result<()> {
        let key = storage_key(&user_id);
        let providers = match self.store.get(&key).await? {
            Some(raw) => match serde_json::from_str::<Vec<LinkedProvider>>(&raw) {
                Ok(list) => dedup_by_id(list),
                Err(e) => {
                    tracing::warn!(%user_id, "ignoring unreadable linked providers: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        tracing::debug!(%user_id, count = providers.len(), "linked providers loaded");
        self.user_id = Some(user_id);
        self.providers = providers;
        Ok(())
    }

    /// Drops the in-memory view. Storage is untouched, so loading the same
    /// user again restores the set.
    pub fn clear(&mut self) {
        self.user_id = None;
        self.providers.clear();
    }

    /// Links `provider`. Returns `false` without writing if its id is
    /// already linked.
    pub async fn link(&mut self, provider: LinkedProvider) -> Result<bool> {
        let user_id = self.require_user()?.clone();
        if self.is_linked(&provider.id) {
            return Ok(false);
        }

        let mut next = self.providers.clone();
        next.push(provider);
        self.persist(&user_id, &next).await?;
        self.providers = next;
        Ok(true)
    }

    /// Unlinks `provider_id`. Returns `false` without writing if it was not
    /// linked.
    pub async fn unlink(&mut self, provider_id: &str) -> Result<bool> {
        let user_id = self.require_user()?.clone();
        if !self.is_linked(provider_id) {
            return Ok(false);
        }

        let next: Vec<LinkedProvider> = self
            .providers
            .iter()
            .filter(|p| p.id != provider_id)
            .cloned()
            .collect();
        self.persist(&user_id, &next).await?;
        self.providers = next;
        Ok(true)
    }

    pub fn is_linked(&self, provider_id: &str) -> bool {
        self.providers.iter().any(|p| p.id == provider_id)
    }

    pub fn by_type(&self, service_type: ServiceType) -> Vec<LinkedProvider> {
        self.providers
            .iter()
            .filter(|p| p.service_type == service_type)
            .cloned()
            .collect()
    }

    pub fn providers(&self) -> &[LinkedProvider] {
        &self.providers
    }

    fn require_user(&self) -> Result<&UserId> {
        self.user_id.as_ref().ok_or(CareNestError::Unauthenticated)
    }

    async fn persist(&self, user_id: &UserId, providers: &[LinkedProvider]) -> Result<()> {
        let json = serde_json::to_string(providers)?;
        self.store.set(&storage_key(user_id), &json).await
    }
}

fn dedup_by_id(list: Vec<LinkedProvider>) -> Vec<LinkedProvider> {
    let mut seen = std::collections::HashSet::new();
    list.into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        values: Mutex<HashMap<String, String>>,
        writes: Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            *self.writes.lock().unwrap() += 1;
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn provider(id: &str, service_type: ServiceType) -> LinkedProvider {
        LinkedProvider::new(id, format!("Provider {}", id), service_type, "care@example.com")
    }

    #[tokio::test]
    async fn test_link_twice_keeps_one() {
        let store = Arc::new(MockStore::default());
        let mut registry = ProviderLinkRegistry::new(store.clone());
        registry.load_for(UserId::new("u1")).await.unwrap();

        assert!(registry.link(provider("p1", ServiceType::Doctor)).await.unwrap());
        assert!(!registry.link(provider("p1", ServiceType::Doctor)).await.unwrap());
        assert_eq!(registry.providers().len(), 1);
        assert_eq!(*store.writes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unlink_and_filters() {
        let store = Arc::new(MockStore::default());
        let mut registry = ProviderLinkRegistry::new(store);
        registry.load_for(UserId::new("u1")).await.unwrap();
        registry.link(provider("p1", ServiceType::Doctor)).await.unwrap();
        registry.link(provider("p2", ServiceType::Ambulance)).await.unwrap();
        registry.link(provider("p3", ServiceType::Doctor)).await.unwrap();

        let doctors: Vec<_> = registry
            .by_type(ServiceType::Doctor)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(doctors, vec!["p1", "p3"]);

        assert!(registry.unlink("p1").await.unwrap());
        assert!(!registry.unlink("p1").await.unwrap());
        assert!(!registry.is_linked("p1"));
        assert!(registry.is_linked("p2"));
    }

    #[tokio::test]
    async fn test_clear_keeps_storage_for_relogin() {
        let store = Arc::new(MockStore::default());
        let mut registry = ProviderLinkRegistry::new(store.clone());
        registry.load_for(UserId::new("u1")).await.unwrap();
        registry.link(provider("p1", ServiceType::Delivery)).await.unwrap();

        registry.clear();
        assert!(registry.providers().is_empty());
        assert!(registry.active_user().is_none());

        registry.load_for(UserId::new("u1")).await.unwrap();
        assert!(registry.is_linked("p1"));

        registry.load_for(UserId::new("u2")).await.unwrap();
        assert!(registry.providers().is_empty());
    }

    #[tokio::test]
    async fn test_mutation_requires_user() {
        let mut registry = ProviderLinkRegistry::new(Arc::new(MockStore::default()));
        let err = registry
            .link(provider("p1", ServiceType::Doctor))
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn test_corrupt_storage_loads_empty() {
        let store = Arc::new(MockStore::default());
        store
            .set(&storage_key(&UserId::new("u1")), "not json")
            .await
            .unwrap();
        let mut registry = ProviderLinkRegistry::new(store);
        registry.load_for(UserId::new("u1")).await.unwrap();
        assert!(registry.providers().is_empty());
    }

    #[test]
    fn test_storage_key_format() {
        assert_eq!(storage_key(&UserId::new("abc")), "patient_providers_abc");
    }
}
