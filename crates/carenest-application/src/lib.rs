//! Application layer for CareNest.
//!
//! Use cases that coordinate the core's domain logic with the adapters:
//! saving confirmed bookings, the confirmation screen's one-shot save,
//! emergency dispatch, conversations and linked providers.

pub mod booking_gateway;
pub mod confirmation_screen;
pub mod conversation_service;
pub mod emergency;
pub mod notifier;
pub mod provider_link_service;
pub mod session_usecase;

pub use booking_gateway::BookingGateway;
pub use confirmation_screen::{ConfirmationScreen, SaveState};
pub use conversation_service::{ActiveConversation, ConversationService};
pub use emergency::{EmergencyDispatch, EmergencyDispatcher};
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use provider_link_service::ProviderLinkService;
pub use session_usecase::SessionUseCase;
