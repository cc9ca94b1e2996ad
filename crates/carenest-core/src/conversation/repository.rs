//! Conversation repository trait.

use super::model::{Conversation, ConversationId, Message, MessageRole, NewConversation};
use crate::auth::UserId;
use crate::error::Result;
use async_trait::async_trait;

/// Durable store for conversations and messages.
///
/// Message insert and conversation touch are separate writes. Callers that
/// need both issue them in sequence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn insert_conversation(&self, conversation: &NewConversation) -> Result<Conversation>;

    /// Appends a message. Messages of one conversation are returned in
    /// insertion order.
    async fn insert_message(
        &self,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message>;

    /// Looks up a conversation header. `None` if it does not exist.
    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Conversation>>;

    /// Sets the conversation's `updated_at` to now.
    async fn touch_conversation(&self, conversation_id: &ConversationId) -> Result<()>;

    /// Lists a user's conversations, most recently updated first.
    async fn list_conversations(&self, user_id: &UserId) -> Result<Vec<Conversation>>;

    async fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>>;

    /// Deletes a conversation together with its messages. Deleting an
    /// unknown id is not an error.
    async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<()>;
}
