use anyhow::Result;
use carenest_application::{
    BookingGateway, ChannelNotifier, ConversationService, ProviderLinkService,
};
use carenest_core::auth::{AuthProvider, UserIdentity};
use carenest_core::config::RootConfig;
use carenest_core::notification::{Notice, NoticeLevel};
use carenest_infrastructure::{
    CareNestPaths, DirConversationRepository, FileKeyValueStore, JsonBookingRepository,
    SessionAuth, StaticCatalogue,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Wires the file-backed adapters into the application services.
pub struct AppContext {
    pub config: RootConfig,
    pub catalogue: StaticCatalogue,
    paths: CareNestPaths,
    auth: Arc<SessionAuth>,
    notifier: Arc<ChannelNotifier>,
    notices: UnboundedReceiver<Notice>,
}

impl AppContext {
    pub async fn new(paths: CareNestPaths, config: RootConfig, user: Option<String>) -> Result<Self> {
        tracing::debug!("Using data directory {}", paths.base_dir().display());

        let auth = Arc::new(SessionAuth::new());
        if let Some(user) = user.filter(|u| !u.trim().is_empty()) {
            auth.sign_in(UserIdentity::new(user.trim())).await;
        }

        let (notifier, notices) = ChannelNotifier::channel();
        Ok(Self {
            config,
            catalogue: StaticCatalogue::builtin(),
            paths,
            auth,
            notifier: Arc::new(notifier),
            notices,
        })
    }

    pub async fn is_signed_in(&self) -> bool {
        self.auth.current_user().await.is_some()
    }

    pub fn gateway(&self) -> BookingGateway {
        BookingGateway::new(
            self.auth.clone(),
            Arc::new(JsonBookingRepository::new(self.paths.bookings_dir())),
            self.notifier.clone(),
        )
    }

    pub fn conversations(&self) -> ConversationService {
        ConversationService::new(
            self.auth.clone(),
            Arc::new(DirConversationRepository::new(self.paths.conversations_dir())),
        )
    }

    pub fn providers(&self) -> ProviderLinkService {
        ProviderLinkService::new(
            self.auth.clone(),
            Arc::new(FileKeyValueStore::new(self.paths.device_storage_file())),
        )
    }

    /// Takes every notice queued so far.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            drained.push(notice);
        }
        drained
    }

    /// Prints queued notices to stderr.
    pub fn flush_notices(&mut self) {
        for notice in self.drain_notices() {
            let marker = match notice.level {
                NoticeLevel::Info => "i",
                NoticeLevel::Success => "✓",
                NoticeLevel::Error => "!",
            };
            eprintln!("[{}] {}", marker, notice.message);
        }
    }
}
