//! Directory-backed `ConversationRepository`.
//!
//! Directory structure:
//! ```text
//! conversations/
//! ├── <conversation-id-1>.json   # conversation header + ordered messages
//! └── <conversation-id-2>.json
//! ```
//!
//! Messages live inside their conversation's file, so deleting the file
//! deletes the messages with it.

use crate::paths::file_stem_for;
use crate::storage::{AtomicJsonFile, run_blocking};
use anyhow::Context;
use async_trait::async_trait;
use carenest_core::auth::UserId;
use carenest_core::conversation::{
    Conversation, ConversationId, ConversationRepository, Message, MessageRole, NewConversation,
};
use carenest_core::{CareNestError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConversationDocument {
    conversation: Conversation,
    #[serde(default)]
    messages: Vec<Message>,
}

pub struct DirConversationRepository {
    dir: PathBuf,
}

impl DirConversationRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn conversations_dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, id: &ConversationId) -> AtomicJsonFile<ConversationDocument> {
        AtomicJsonFile::new(self.dir.join(format!("{}.json", file_stem_for(id.as_str()))))
    }

    async fn load(&self, id: &ConversationId) -> Result<ConversationDocument> {
        let file = self.file_for(id);
        run_blocking(move || file.load())
            .await?
            .ok_or_else(|| CareNestError::not_found("Conversation", id.as_str()))
    }

    /// Applies `f` to an existing document under the file lock.
    async fn modify<R, F>(&self, id: &ConversationId, f: F) -> Result<R>
    where
        F: FnOnce(&mut ConversationDocument) -> R + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file_for(id);
        run_blocking(move || file.update_existing(|doc| Ok(f(doc))))
            .await?
            .ok_or_else(|| CareNestError::not_found("Conversation", id.as_str()))
    }

    async fn read_all(&self) -> anyhow::Result<Vec<ConversationDocument>> {
        let mut documents = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(documents),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read conversations directory {}", self.dir.display())
                });
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to iterate conversations directory")?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<ConversationDocument>(&content) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!("Skipping unreadable conversation {}: {}", path.display(), e);
                }
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl ConversationRepository for DirConversationRepository {
    async fn insert_conversation(&self, conversation: &NewConversation) -> Result<Conversation> {
        let now = Utc::now();
        let created = Conversation {
            id: ConversationId::new(Uuid::new_v4().to_string()),
            user_id: conversation.user_id.clone(),
            title: conversation.title.clone(),
            created_at: now,
            updated_at: now,
        };
        let document = ConversationDocument {
            conversation: created.clone(),
            messages: Vec::new(),
        };

        let file = self.file_for(&created.id);
        run_blocking(move || file.save(&document)).await?;
        Ok(created)
    }

    async fn insert_message(
        &self,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let stored = message.clone();
        self.modify(conversation_id, move |doc| doc.messages.push(stored))
            .await?;
        Ok(message)
    }

    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Conversation>> {
        let file = self.file_for(conversation_id);
        let document = run_blocking(move || file.load()).await?;
        Ok(document.map(|doc| doc.conversation))
    }

    async fn touch_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        let now = Utc::now();
        self.modify(conversation_id, move |doc| doc.conversation.updated_at = now)
            .await
    }

    async fn list_conversations(&self, user_id: &UserId) -> Result<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> = self
            .read_all()
            .await
            .map_err(|e| CareNestError::data_access(format!("{:#}", e)))?
            .into_iter()
            .map(|doc| doc.conversation)
            .filter(|c| &c.user_id == user_id)
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        Ok(self.load(conversation_id).await?.messages)
    }

    async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        let file = self.file_for(conversation_id);
        run_blocking(move || file.remove()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_conversation(user: &str, title: &str) -> NewConversation {
        NewConversation {
            user_id: UserId::new(user),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_messages_keep_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path().join("conversations"));
        let conv = repo
            .insert_conversation(&new_conversation("u1", "Fever"))
            .await
            .unwrap();

        repo.insert_message(&conv.id, MessageRole::User, "I have a fever")
            .await
            .unwrap();
        repo.insert_message(&conv.id, MessageRole::Assistant, "How long?")
            .await
            .unwrap();

        let messages = repo.list_messages(&conv.id).await.unwrap();
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
        assert_eq!(messages[0].content, "I have a fever");
    }

    #[tokio::test]
    async fn test_get_conversation_reports_owner() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());
        let conv = repo
            .insert_conversation(&new_conversation("u7", "Allergy"))
            .await
            .unwrap();

        let found = repo.get_conversation(&conv.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, UserId::new("u7"));
        assert!(
            repo.get_conversation(&ConversationId::new("missing"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_touch_reorders_listing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());
        let older = repo
            .insert_conversation(&new_conversation("u1", "older"))
            .await
            .unwrap();
        let newer = repo
            .insert_conversation(&new_conversation("u1", "newer"))
            .await
            .unwrap();
        repo.insert_conversation(&new_conversation("u2", "someone else"))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.touch_conversation(&older.id).await.unwrap();

        let listed = repo.list_conversations(&UserId::new("u1")).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_unknown_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());
        let conv = repo
            .insert_conversation(&new_conversation("u1", "t"))
            .await
            .unwrap();
        repo.insert_message(&conv.id, MessageRole::User, "hi")
            .await
            .unwrap();

        repo.delete_conversation(&conv.id).await.unwrap();
        repo.delete_conversation(&conv.id).await.unwrap();

        assert!(repo.list_messages(&conv.id).await.unwrap_err().is_not_found());
        assert!(
            repo.insert_message(&conv.id, MessageRole::User, "late")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(repo.list_conversations(&UserId::new("u1")).await.unwrap().is_empty());
    }
}
