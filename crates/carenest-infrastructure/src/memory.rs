//! In-memory adapters.
//!
//! Used by tests and by hosts that do not need durability. Each one can be
//! told to fail so callers can exercise their error paths.

use async_trait::async_trait;
use carenest_core::auth::UserId;
use carenest_core::booking::{BookingId, BookingRecord, BookingRepository, NewBooking};
use carenest_core::conversation::{
    Conversation, ConversationId, ConversationRepository, Message, MessageRole, NewConversation,
};
use carenest_core::provider_link::KeyValueStore;
use carenest_core::{CareNestError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::json_booking_repository::{find_confirmed, sort_history};

#[derive(Default)]
pub struct InMemoryBookingRepository {
    records: RwLock<Vec<BookingRecord>>,
    insert_calls: AtomicUsize,
    failure: std::sync::Mutex<Option<String>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following insert fail with `message`. `None` heals.
    pub fn set_failure(&self, message: Option<&str>) {
        let mut failure = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *failure = message.map(str::to_string);
    }

    /// Number of insert calls, successful or not.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub async fn all(&self) -> Vec<BookingRecord> {
        self.records.read().await.clone()
    }

    fn current_failure(&self) -> Option<String> {
        self.failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, user_id: &UserId, booking: &NewBooking) -> Result<BookingId> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.current_failure() {
            return Err(CareNestError::data_access(message));
        }

        let mut records = self.records.write().await;
        if let Some(existing) = find_confirmed(&records, user_id, booking) {
            return Ok(existing);
        }
        let id = BookingId::new(Uuid::new_v4().to_string());
        records.push(BookingRecord::new(id.clone(), user_id.clone(), booking.clone()));
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<BookingRecord>> {
        let mut records: Vec<BookingRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        sort_history(&mut records);
        Ok(records)
    }
}

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CareNestError::io("device storage is read-only"));
        }
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<ConversationId, (Conversation, Vec<Message>)>>,
    fail_touches: AtomicBool,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `touch_conversation` fail while message inserts keep working.
    pub fn set_fail_touches(&self, fail: bool) {
        self.fail_touches.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn insert_conversation(&self, conversation: &NewConversation) -> Result<Conversation> {
        let now = Utc::now();
        let created = Conversation {
            id: ConversationId::new(Uuid::new_v4().to_string()),
            user_id: conversation.user_id.clone(),
            title: conversation.title.clone(),
            created_at: now,
            updated_at: now,
        };
        self.conversations
            .write()
            .await
            .insert(created.id.clone(), (created.clone(), Vec::new()));
        Ok(created)
    }

    async fn insert_message(
        &self,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        let mut conversations = self.conversations.write().await;
        let (_, messages) = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| CareNestError::not_found("Conversation", conversation_id.as_str()))?;

        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        messages.push(message.clone());
        Ok(message)
    }

    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Conversation>> {
        Ok(self
            .conversations
            .read()
            .await
            .get(conversation_id)
            .map(|(conversation, _)| conversation.clone()))
    }

    async fn touch_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        if self.fail_touches.load(Ordering::SeqCst) {
            return Err(CareNestError::data_access("conversation update rejected"));
        }
        let mut conversations = self.conversations.write().await;
        let (conversation, _) = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| CareNestError::not_found("Conversation", conversation_id.as_str()))?;
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn list_conversations(&self, user_id: &UserId) -> Result<Vec<Conversation>> {
        let mut listed: Vec<Conversation> = self
            .conversations
            .read()
            .await
            .values()
            .map(|(c, _)| c)
            .filter(|c| &c.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }

    async fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .map(|(_, messages)| messages.clone())
            .ok_or_else(|| CareNestError::not_found("Conversation", conversation_id.as_str()))
    }

    async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        self.conversations.write().await.remove(conversation_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carenest_core::booking::{BookingStatus, BookingType};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_booking_failure_toggle_counts_calls() {
        let repo = InMemoryBookingRepository::new();
        let booking = NewBooking {
            booking_type: BookingType::Doctor,
            title: "Consultation with Dr. Rao".into(),
            provider_name: "Dr. Rao".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            booking_time: "11:00 AM".into(),
            amount: 500,
            location: None,
            notes: None,
            status: BookingStatus::Upcoming,
            confirmation_id: None,
        };
        let user = UserId::new("u");

        repo.set_failure(Some("offline"));
        assert!(repo.insert(&user, &booking).await.unwrap_err().is_persistence());
        repo.set_failure(None);
        repo.insert(&user, &booking).await.unwrap();

        assert_eq!(repo.insert_calls(), 2);
        assert_eq!(repo.list_for_user(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_touch_failure_leaves_messages_writable() {
        let repo = InMemoryConversationRepository::new();
        let conv = repo
            .insert_conversation(&NewConversation {
                user_id: UserId::new("u"),
                title: "t".into(),
            })
            .await
            .unwrap();
        repo.set_fail_touches(true);

        assert!(repo.touch_conversation(&conv.id).await.is_err());
        repo.insert_message(&conv.id, MessageRole::User, "still here")
            .await
            .unwrap();
        assert_eq!(repo.list_messages(&conv.id).await.unwrap().len(), 1);
    }
}
