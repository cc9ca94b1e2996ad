//! In-process auth session.

use async_trait::async_trait;
use carenest_core::auth::{AuthProvider, UserIdentity};
use tokio::sync::RwLock;

/// Holds the signed-in user for the lifetime of the process.
#[derive(Default)]
pub struct SessionAuth {
    current: RwLock<Option<UserIdentity>>,
}

impl SessionAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserIdentity) -> Self {
        Self {
            current: RwLock::new(Some(user)),
        }
    }

    pub async fn sign_in(&self, user: UserIdentity) {
        tracing::info!(user_id = %user.id, "signed in");
        *self.current.write().await = Some(user);
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_user(&self) -> Option<UserIdentity> {
        self.current.read().await.clone()
    }

    async fn sign_out(&self) {
        if let Some(user) = self.current.write().await.take() {
            tracing::info!(user_id = %user.id, "signed out");
        }
    }
}
