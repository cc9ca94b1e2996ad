//! Booking persistence gateway.
//!
//! Turns a confirmed draft into at most one durable `BookingRecord`. Missing
//! authentication and storage failures are outcomes, not errors: the
//! booking is already confirmed from the user's point of view.

use carenest_core::auth::AuthProvider;
use carenest_core::booking::{
    BookingId, BookingRecord, BookingRepository, ConfirmedDraft, NewBooking, SaveOutcome,
};
use carenest_core::notification::{Notice, Notifier};
use carenest_core::{CareNestError, Result};
use std::sync::Arc;

/// Shown when an authenticated save fails.
pub const SAVE_FAILED_NOTICE: &str = "Booking confirmed, but it was not saved to your history";

#[derive(Clone)]
pub struct BookingGateway {
    auth: Arc<dyn AuthProvider>,
    repository: Arc<dyn BookingRepository>,
    notifier: Arc<dyn Notifier>,
}

impl BookingGateway {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        repository: Arc<dyn BookingRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            repository,
            notifier,
        }
    }

    /// Saves `draft` and notifies the user if the write failed.
    ///
    /// Returns the stored id, or `None` when nothing was stored. Saving the
    /// same confirmation again returns the id of the record already stored.
    pub async fn save(&self, draft: &ConfirmedDraft) -> Option<BookingId> {
        let outcome = self.submit(draft).await;
        self.report(&outcome);
        outcome.into_booking_id()
    }

    /// Saves `draft` without notifying anyone.
    pub async fn submit(&self, draft: &ConfirmedDraft) -> SaveOutcome {
        tracing::debug!(
            confirmation_id = %draft.confirmation_id(),
            vertical = %draft.vertical(),
            "submitting confirmed booking"
        );
        self.persist(&draft.to_new_booking()).await
    }

    /// Writes one record for the signed-in user.
    pub async fn persist(&self, booking: &NewBooking) -> SaveOutcome {
        let Some(user) = self.auth.current_user().await else {
            tracing::debug!(
                booking_type = %booking.booking_type,
                "no signed-in user, booking not persisted"
            );
            return SaveOutcome::SkippedUnauthenticated;
        };

        match self.repository.insert(&user.id, booking).await {
            Ok(id) => {
                tracing::info!(
                    user_id = %user.id,
                    booking_id = %id,
                    booking_type = %booking.booking_type,
                    amount = booking.amount,
                    "booking saved"
                );
                SaveOutcome::Saved(id)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    booking_type = %booking.booking_type,
                    "failed to save booking: {}",
                    e
                );
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Sends the user-facing notice for `outcome`, if it needs one.
    pub fn report(&self, outcome: &SaveOutcome) {
        if outcome.is_failure() {
            self.notifier.notify(Notice::error(SAVE_FAILED_NOTICE));
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Booking history of the signed-in user.
    pub async fn history(&self) -> Result<Vec<BookingRecord>> {
        let user = self
            .auth
            .current_user()
            .await
            .ok_or(CareNestError::Unauthenticated)?;
        self.repository.list_for_user(&user.id).await
    }
}
