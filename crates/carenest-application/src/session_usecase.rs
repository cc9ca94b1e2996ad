//! Sign-out across the stateful services.

use crate::conversation_service::ConversationService;
use crate::provider_link_service::ProviderLinkService;
use carenest_core::Result;
use carenest_core::auth::AuthProvider;
use std::sync::Arc;

/// Coordinates the services that hold per-user state in memory.
pub struct SessionUseCase {
    auth: Arc<dyn AuthProvider>,
    providers: Arc<ProviderLinkService>,
    conversations: Arc<ConversationService>,
}

impl SessionUseCase {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        providers: Arc<ProviderLinkService>,
        conversations: Arc<ConversationService>,
    ) -> Self {
        Self {
            auth,
            providers,
            conversations,
        }
    }

    /// Call after the auth session changed (sign-in or account switch).
    pub async fn on_user_changed(&self) -> Result<()> {
        self.conversations.reset().await;
        self.providers.sync_with_session().await
    }

    /// Ends the session and drops per-user in-memory state. Stored data
    /// stays so the same account gets it back on the next sign-in.
    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
        self.providers.clear().await;
        self.conversations.reset().await;
    }
}
