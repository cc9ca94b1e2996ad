use carenest_application::{ConversationService, ProviderLinkService, SessionUseCase};
use carenest_core::auth::{AuthProvider, UserIdentity};
use carenest_core::provider_link::{KeyValueStore, LinkedProvider, ServiceType, storage_key};
use carenest_infrastructure::{FileKeyValueStore, InMemoryConversationRepository, SessionAuth};
use std::sync::Arc;
use tempfile::TempDir;

fn provider(id: &str, service_type: ServiceType) -> LinkedProvider {
    LinkedProvider::new(id, format!("Provider {}", id), service_type, "desk@example.com")
        .with_rating(4.5)
}

#[tokio::test]
async fn test_link_is_idempotent_and_persisted_per_user() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileKeyValueStore::new(temp_dir.path().join("device_storage.json")));
    let auth = Arc::new(SessionAuth::signed_in(UserIdentity::new("patient-1")));
    let service = ProviderLinkService::new(auth.clone(), store.clone());

    assert!(service.link(provider("p1", ServiceType::Doctor)).await.unwrap());
    assert!(!service.link(provider("p1", ServiceType::Doctor)).await.unwrap());
    service
        .link(provider("p2", ServiceType::Ambulance))
        .await
        .unwrap();

    assert_eq!(service.providers().await.unwrap().len(), 2);
    assert_eq!(service.by_type(ServiceType::Ambulance).await.unwrap()[0].id, "p2");
    assert!(service.by_type(ServiceType::Delivery).await.unwrap().is_empty());

    let user = auth.current_user().await.unwrap();
    let raw = store.get(&storage_key(&user.id)).await.unwrap().unwrap();
    let stored: Vec<LinkedProvider> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 2);

    assert!(service.unlink("p1").await.unwrap());
    assert!(!service.unlink("p1").await.unwrap());
    assert!(!service.is_linked("p1").await.unwrap());
}

#[tokio::test]
async fn test_sign_out_clears_view_and_relogin_restores() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileKeyValueStore::new(temp_dir.path().join("device_storage.json")));
    let auth = Arc::new(SessionAuth::signed_in(UserIdentity::new("patient-1")));
    let providers = Arc::new(ProviderLinkService::new(auth.clone(), store));
    let conversations = Arc::new(ConversationService::new(
        auth.clone(),
        Arc::new(InMemoryConversationRepository::new()),
    ));
    let session = SessionUseCase::new(auth.clone(), providers.clone(), conversations.clone());

    providers
        .link(provider("home-1", ServiceType::NursingHome))
        .await
        .unwrap();
    conversations.create_conversation("hello").await.unwrap();

    session.sign_out().await;
    assert!(auth.current_user().await.is_none());
    assert!(conversations.active().await.id.is_none());
    assert!(providers.providers().await.unwrap().is_empty());
    assert!(
        providers
            .link(provider("x", ServiceType::Doctor))
            .await
            .unwrap_err()
            .is_unauthenticated()
    );

    auth.sign_in(UserIdentity::new("patient-2")).await;
    session.on_user_changed().await.unwrap();
    assert!(providers.providers().await.unwrap().is_empty());

    auth.sign_in(UserIdentity::new("patient-1")).await;
    session.on_user_changed().await.unwrap();
    assert!(providers.is_linked("home-1").await.unwrap());
}
