//! Confirmation screen save guard.
//!
//! The host may fire the "on confirmed" effect any number of times (for
//! example on every re-render). The screen holds an explicit
//! `Unsaved -> Saving -> Saved` state and only the first call starts a
//! save. The save runs on its own task, so dismissing the screen does not
//! cancel the write; it only stops the result from being delivered.

use crate::booking_gateway::BookingGateway;
use carenest_core::booking::{ConfirmedDraft, SaveOutcome};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Unsaved,
    Saving,
    Saved(SaveOutcome),
}

/// What the screen has delivered to its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivery {
    Pending,
    Delivered(SaveOutcome),
    Disposed,
}

struct ScreenState {
    save: SaveState,
    mounted: bool,
}

pub struct ConfirmationScreen {
    draft: Arc<ConfirmedDraft>,
    gateway: BookingGateway,
    state: Arc<Mutex<ScreenState>>,
    delivery: Arc<watch::Sender<Delivery>>,
}

impl ConfirmationScreen {
    pub fn new(draft: ConfirmedDraft, gateway: BookingGateway) -> Self {
        let (delivery, _) = watch::channel(Delivery::Pending);
        Self {
            draft: Arc::new(draft),
            gateway,
            state: Arc::new(Mutex::new(ScreenState {
                save: SaveState::Unsaved,
                mounted: true,
            })),
            delivery: Arc::new(delivery),
        }
    }

    pub fn draft(&self) -> &ConfirmedDraft {
        &self.draft
    }

    pub fn save_state(&self) -> SaveState {
        lock(&self.state).save.clone()
    }

    pub fn is_mounted(&self) -> bool {
        lock(&self.state).mounted
    }

    /// The "on confirmed" effect.
    ///
    /// The first call moves `Unsaved -> Saving` and spawns the save; it
    /// returns the task handle, which callers may await or drop. Every later
    /// call, and any call after `dismiss`, returns `None` and does nothing.
    /// Must be called within a tokio runtime.
    pub fn on_confirmed(&self) -> Option<JoinHandle<()>> {
        {
            let mut state = lock(&self.state);
            if !state.mounted || state.save != SaveState::Unsaved {
                tracing::trace!(
                    confirmation_id = %self.draft.confirmation_id(),
                    "save already started, ignoring repeat confirm"
                );
                return None;
            }
            state.save = SaveState::Saving;
        }

        let draft = Arc::clone(&self.draft);
        let gateway = self.gateway.clone();
        let state = Arc::clone(&self.state);
        let delivery = Arc::clone(&self.delivery);

        Some(tokio::spawn(async move {
            let outcome = gateway.submit(&draft).await;

            let deliver = {
                let mut state = lock(&state);
                state.save = SaveState::Saved(outcome.clone());
                if state.mounted {
                    delivery.send_replace(Delivery::Delivered(outcome.clone()));
                }
                state.mounted
            };

            if deliver {
                gateway.report(&outcome);
            } else {
                tracing::debug!(
                    confirmation_id = %draft.confirmation_id(),
                    "screen dismissed before save finished, result dropped"
                );
            }
        }))
    }

    /// Marks the screen as gone. An in-flight save still completes, but its
    /// result is neither delivered nor reported.
    pub fn dismiss(&self) {
        let mut state = lock(&self.state);
        state.mounted = false;
        self.delivery.send_if_modified(|current| {
            if *current == Delivery::Pending {
                *current = Delivery::Disposed;
                true
            } else {
                false
            }
        });
    }

    /// Waits for the save result.
    ///
    /// Returns `None` if no save was started or the screen was dismissed
    /// before the result arrived.
    pub async fn outcome(&self) -> Option<SaveOutcome> {
        if lock(&self.state).save == SaveState::Unsaved {
            return None;
        }

        let mut receiver = self.delivery.subscribe();
        loop {
            let current = receiver.borrow_and_update().clone();
            match current {
                Delivery::Delivered(outcome) => return Some(outcome),
                Delivery::Disposed => return None,
                Delivery::Pending => {}
            }
            if receiver.changed().await.is_err() {
                return None;
            }
        }
    }
}

fn lock(state: &Mutex<ScreenState>) -> MutexGuard<'_, ScreenState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
