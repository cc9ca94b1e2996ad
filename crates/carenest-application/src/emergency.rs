//! Emergency SOS dispatch.

use crate::booking_gateway::BookingGateway;
use carenest_core::booking::{BookingStatus, BookingType, NewBooking, SaveOutcome};
use carenest_core::notification::Notice;
use chrono::{DateTime, Local};
use uuid::Uuid;

pub const AMBULANCE_PROVIDER: &str = "CareNest Ambulance";

/// Result of an SOS trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyDispatch {
    /// Reference quoted to the user, e.g. `SOS-1A2B3C4D`.
    pub reference: String,
    pub outcome: SaveOutcome,
}

pub struct EmergencyDispatcher {
    gateway: BookingGateway,
}

impl EmergencyDispatcher {
    pub fn new(gateway: BookingGateway) -> Self {
        Self { gateway }
    }

    /// Records an emergency booking at `location` and notifies the user.
    ///
    /// Dispatch is confirmed even if the record could not be stored.
    pub async fn trigger(&self, location: &str) -> EmergencyDispatch {
        self.trigger_at(location, Local::now()).await
    }

    pub async fn trigger_at(&self, location: &str, now: DateTime<Local>) -> EmergencyDispatch {
        let reference = format!(
            "SOS-{}",
            Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        let location = location.trim();
        tracing::warn!(%reference, location, "emergency SOS triggered");

        let booking = NewBooking {
            booking_type: BookingType::Emergency,
            title: "Emergency SOS".to_string(),
            provider_name: AMBULANCE_PROVIDER.to_string(),
            booking_date: now.date_naive(),
            booking_time: now.format("%I:%M %p").to_string(),
            amount: 0,
            location: (!location.is_empty()).then(|| location.to_string()),
            notes: Some(format!("Reference: {}", reference)),
            status: BookingStatus::Upcoming,
            confirmation_id: None,
        };

        let outcome = self.gateway.persist(&booking).await;
        self.gateway.report(&outcome);
        self.gateway.notifier().notify(Notice::success(format!(
            "Ambulance dispatched. Reference {}",
            reference
        )));

        EmergencyDispatch { reference, outcome }
    }
}
