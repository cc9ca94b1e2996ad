//! Booking repository trait.

use super::record::{BookingId, BookingRecord, NewBooking};
use crate::auth::UserId;
use crate::error::Result;
use async_trait::async_trait;

/// Durable store for booking records.
///
/// Each `insert` is a single atomic row insert. Implementations must never
/// write a partial row.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts one record owned by `user_id` and returns its new id.
    ///
    /// When `booking.confirmation_id` matches a record the user already
    /// has, nothing is written and the existing id is returned.
    async fn insert(&self, user_id: &UserId, booking: &NewBooking) -> Result<BookingId>;

    /// Lists a user's bookings, latest booking date first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<BookingRecord>>;
}
