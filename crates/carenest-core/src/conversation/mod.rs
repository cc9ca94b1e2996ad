//! Conversation domain module.
//!
//! Chat-style conversations and their ordered message history.
//!
//! # Module Structure
//!
//! - `model`: `Conversation`, `Message`, `MessageRole`, title derivation
//! - `repository`: `ConversationRepository` trait

mod model;
mod repository;

pub use model::{
    Conversation, ConversationId, MAX_TITLE_CHARS, Message, MessageRole, NewConversation,
    derive_title,
};
pub use repository::ConversationRepository;
