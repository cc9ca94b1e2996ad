//! Conversation use case.
//!
//! Keeps one active conversation per signed-in user and mirrors its message
//! history in memory. Switching conversations is tagged with a generation
//! number so a slow load for an earlier switch never replaces the messages
//! of a later one.

use carenest_core::auth::{AuthProvider, UserId};
use carenest_core::conversation::{
    Conversation, ConversationId, ConversationRepository, Message, MessageRole, NewConversation,
    derive_title,
};
use carenest_core::{CareNestError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Snapshot of the active conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveConversation {
    /// `None` means a new, not yet created conversation.
    pub id: Option<ConversationId>,
    pub messages: Vec<Message>,
    pub loading: bool,
}

pub struct ConversationService {
    auth: Arc<dyn AuthProvider>,
    repository: Arc<dyn ConversationRepository>,
    active: RwLock<ActiveConversation>,
    generation: AtomicU64,
}

impl ConversationService {
    pub fn new(auth: Arc<dyn AuthProvider>, repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            auth,
            repository,
            active: RwLock::new(ActiveConversation::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn active(&self) -> ActiveConversation {
        self.active.read().await.clone()
    }

    /// Conversations of the signed-in user, most recently updated first.
    /// Empty when nobody is signed in.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        match self.current_user().await {
            Some(user) => self.repository.list_conversations(&user).await,
            None => Ok(Vec::new()),
        }
    }

    /// Creates a conversation titled after `first_message` and makes it
    /// active. Returns `None` when nobody is signed in.
    ///
    /// The message itself is not stored; append it separately.
    pub async fn create_conversation(&self, first_message: &str) -> Result<Option<ConversationId>> {
        let Some(user_id) = self.current_user().await else {
            tracing::debug!("no signed-in user, conversation not created");
            return Ok(None);
        };

        let conversation = self
            .repository
            .insert_conversation(&NewConversation {
                user_id,
                title: derive_title(first_message),
            })
            .await?;
        tracing::debug!(
            conversation_id = %conversation.id,
            title = %conversation.title,
            "conversation created"
        );

        let mut active = self.active.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *active = ActiveConversation {
            id: Some(conversation.id.clone()),
            messages: Vec::new(),
            loading: false,
        };
        Ok(Some(conversation.id))
    }

    /// Stores a message, then bumps the conversation's `updated_at`.
    ///
    /// The two writes are independent. A failed timestamp update is logged
    /// and does not fail the append; the conversation may then sort as
    /// older than it is.
    pub async fn append_message(
        &self,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        self.require_owner(conversation_id).await?;

        let message = self
            .repository
            .insert_message(conversation_id, role, content)
            .await?;

        if let Err(e) = self.repository.touch_conversation(conversation_id).await {
            tracing::warn!(
                %conversation_id,
                "message stored but conversation timestamp not updated: {}",
                e
            );
        }

        let mut active = self.active.write().await;
        if active.id.as_ref() == Some(conversation_id) && !active.loading {
            active.messages.push(message.clone());
        }
        Ok(message)
    }

    /// Makes `conversation_id` active and loads its full history.
    ///
    /// `loading` is set for the duration. If another switch (or a reset)
    /// happens meanwhile, this load's result is discarded.
    pub async fn switch_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        self.require_owner(conversation_id).await?;

        let generation = {
            let mut active = self.active.write().await;
            active.id = Some(conversation_id.clone());
            active.messages.clear();
            active.loading = true;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let loaded = self.repository.list_messages(conversation_id).await;

        let mut active = self.active.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(%conversation_id, "discarding stale conversation load");
            return Ok(());
        }
        active.loading = false;
        active.messages = loaded?;
        Ok(())
    }

    /// Deletes a conversation and its messages. Resets the active state if
    /// it was the active one. Unknown ids and other users' conversations
    /// are `NotFound`.
    pub async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        self.require_owner(conversation_id).await?;
        self.repository.delete_conversation(conversation_id).await?;

        let is_active = self.active.read().await.id.as_ref() == Some(conversation_id);
        if is_active {
            self.reset().await;
        }
        Ok(())
    }

    /// Back to the empty, new-conversation state.
    pub async fn reset(&self) {
        let mut active = self.active.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *active = ActiveConversation::default();
    }

    async fn current_user(&self) -> Option<UserId> {
        self.auth.current_user().await.map(|user| user.id)
    }

    async fn require_user(&self) -> Result<UserId> {
        self.current_user()
            .await
            .ok_or(CareNestError::Unauthenticated)
    }

    /// Conversations of other users are reported as missing.
    async fn require_owner(&self, conversation_id: &ConversationId) -> Result<UserId> {
        let user_id = self.require_user().await?;
        match self.repository.get_conversation(conversation_id).await? {
            Some(conversation) if conversation.user_id == user_id => Ok(user_id),
            _ => Err(CareNestError::not_found(
                "Conversation",
                conversation_id.as_str(),
            )),
        }
    }
}
