//! Adapters for the CareNest core traits.
//!
//! File-backed implementations live next to in-memory ones so the CLI and
//! the tests can pick either without touching the application layer.

pub mod config_service;
pub mod dir_conversation_repository;
pub mod file_kv_store;
pub mod json_booking_repository;
pub mod memory;
pub mod paths;
pub mod session_auth;
pub mod static_catalogue;
pub mod storage;

pub use config_service::ConfigService;
pub use dir_conversation_repository::DirConversationRepository;
pub use file_kv_store::FileKeyValueStore;
pub use json_booking_repository::JsonBookingRepository;
pub use memory::{InMemoryBookingRepository, InMemoryConversationRepository, InMemoryKeyValueStore};
pub use paths::CareNestPaths;
pub use session_auth::SessionAuth;
pub use static_catalogue::StaticCatalogue;
