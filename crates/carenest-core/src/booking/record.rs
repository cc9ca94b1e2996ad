//! Durable booking records.

use super::vertical::{BookingStatus, BookingType};
use crate::auth::UserId;
use crate::pricing::Rupees;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-assigned, opaque booking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record content before the store assigns an id and owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub booking_type: BookingType,
    pub title: String,
    pub provider_name: String,
    /// Serialized as `YYYY-MM-DD`.
    pub booking_date: NaiveDate,
    /// Slot label.
    pub booking_time: String,
    pub amount: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    /// The confirmation this record was written for. A store that already
    /// holds a record with the same confirmation returns that record's id
    /// instead of inserting again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_id: Option<Uuid>,
}

/// A booking as stored. Never mutated by the core after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub booking: NewBooking,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn new(id: BookingId, user_id: UserId, booking: NewBooking) -> Self {
        Self {
            id,
            user_id,
            booking,
            created_at: Utc::now(),
        }
    }
}

/// What happened when a confirmed draft was handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Exactly one record was written.
    Saved(BookingId),
    /// No user was signed in, so nothing was written. Not a failure.
    SkippedUnauthenticated,
    /// The write failed. Terminal for this attempt.
    Failed(String),
}

impl SaveOutcome {
    pub fn booking_id(&self) -> Option<&BookingId> {
        match self {
            SaveOutcome::Saved(id) => Some(id),
            _ => None,
        }
    }

    pub fn into_booking_id(self) -> Option<BookingId> {
        match self {
            SaveOutcome::Saved(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SaveOutcome::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_flat_with_iso_date() {
        let record = BookingRecord::new(
            BookingId::new("b-1"),
            UserId::new("u-1"),
            NewBooking {
                booking_type: BookingType::Nurse,
                title: "Nursing care: Injections".into(),
                provider_name: "Sister Anita".into(),
                booking_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
                booking_time: "10:00 AM".into(),
                amount: 897,
                location: None,
                notes: None,
                status: BookingStatus::Upcoming,
                confirmation_id: None,
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["booking_type"], "nurse");
        assert_eq!(json["booking_date"], "2026-03-09");
        assert_eq!(json["status"], "upcoming");
        assert!(json.get("location").is_none());
        assert!(json.get("confirmation_id").is_none());

        let back: BookingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
