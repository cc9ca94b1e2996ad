//! File-backed `BookingRepository`.
//!
//! Directory structure:
//! ```text
//! bookings/
//! ├── <user-id-1>.json   # JSON array of BookingRecord
//! └── <user-id-2>.json
//! ```

use crate::paths::file_stem_for;
use crate::storage::{AtomicJsonFile, run_blocking};
use async_trait::async_trait;
use carenest_core::Result;
use carenest_core::auth::UserId;
use carenest_core::booking::{BookingId, BookingRecord, BookingRepository, NewBooking};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct JsonBookingRepository {
    dir: PathBuf,
}

impl JsonBookingRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bookings_dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, user_id: &UserId) -> AtomicJsonFile<Vec<BookingRecord>> {
        AtomicJsonFile::new(
            self.dir
                .join(format!("{}.json", file_stem_for(user_id.as_str()))),
        )
    }
}

/// Id of the record `user_id` already holds for `booking`'s confirmation.
pub(crate) fn find_confirmed(
    records: &[BookingRecord],
    user_id: &UserId,
    booking: &NewBooking,
) -> Option<BookingId> {
    let confirmation_id = booking.confirmation_id?;
    records
        .iter()
        .find(|r| &r.user_id == user_id && r.booking.confirmation_id == Some(confirmation_id))
        .map(|r| r.id.clone())
}

/// Most recent booking date first; same-day bookings by creation time.
pub(crate) fn sort_history(records: &mut [BookingRecord]) {
    records.sort_by_key(|r| Reverse((r.booking.booking_date, r.created_at)));
}

#[async_trait]
impl BookingRepository for JsonBookingRepository {
    async fn insert(&self, user_id: &UserId, booking: &NewBooking) -> Result<BookingId> {
        let file = self.file_for(user_id);
        let record = BookingRecord::new(
            BookingId::new(Uuid::new_v4().to_string()),
            user_id.clone(),
            booking.clone(),
        );
        let owner = user_id.clone();
        let incoming = booking.clone();

        let (id, appended) = run_blocking(move || {
            file.update(Vec::new(), |records| {
                if let Some(existing) = find_confirmed(records, &owner, &incoming) {
                    return Ok((existing, false));
                }
                let id = record.id.clone();
                records.push(record);
                Ok((id, true))
            })
        })
        .await?;

        if appended {
            tracing::debug!(%user_id, booking_id = %id, "booking appended");
        } else {
            tracing::debug!(%user_id, booking_id = %id, "confirmation already stored");
        }
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<BookingRecord>> {
        let file = self.file_for(user_id);
        let mut records = run_blocking(move || Ok(file.load()?.unwrap_or_default())).await?;
        records.retain(|r| r.user_id == *user_id);
        sort_history(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carenest_core::booking::{BookingStatus, BookingType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn booking(day: u32, amount: u64) -> NewBooking {
        NewBooking {
            booking_type: BookingType::Lab,
            title: "Lab tests: CBC".into(),
            provider_name: "CareNest Diagnostics".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            booking_time: "09:00 AM".into(),
            amount,
            location: Some("12 Park Street".into()),
            notes: None,
            status: BookingStatus::Upcoming,
            confirmation_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids_and_lists_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path().join("bookings"));
        let user = UserId::new("user-1");

        let first = repo.insert(&user, &booking(3, 300)).await.unwrap();
        let second = repo.insert(&user, &booking(9, 900)).await.unwrap();
        assert_ne!(first, second);

        let history = repo.list_for_user(&user).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[0].booking.amount, 900);
        assert_eq!(history[1].user_id, user);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path());
        repo.insert(&UserId::new("a"), &booking(1, 100)).await.unwrap();

        assert!(repo.list_for_user(&UserId::new("b")).await.unwrap().is_empty());
        assert!(temp_dir.path().join("a.json").exists());
    }

    #[tokio::test]
    async fn test_similar_user_ids_do_not_share_history() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path());
        let dotted = UserId::new("alice.b");
        let underscored = UserId::new("alice_b");
        repo.insert(&dotted, &booking(2, 200)).await.unwrap();

        assert!(repo.list_for_user(&underscored).await.unwrap().is_empty());
        assert_eq!(repo.list_for_user(&dotted).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_records_in_a_file_are_not_listed() {
        let temp_dir = TempDir::new().unwrap();
        let owner = UserId::new("u");
        let stray = BookingRecord::new(BookingId::new("x"), UserId::new("other"), booking(4, 400));
        std::fs::write(
            temp_dir.path().join("u.json"),
            serde_json::to_string(&vec![stray]).unwrap(),
        )
        .unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path());
        repo.insert(&owner, &booking(5, 500)).await.unwrap();

        let history = repo.list_for_user(&owner).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, owner);
    }

    #[tokio::test]
    async fn test_same_confirmation_is_stored_once() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path());
        let user = UserId::new("u");
        let confirmed = NewBooking {
            confirmation_id: Some(Uuid::new_v4()),
            ..booking(6, 600)
        };

        let first = repo.insert(&user, &confirmed).await.unwrap();
        let again = repo.insert(&user, &confirmed).await.unwrap();
        assert_eq!(first, again);

        let fresh = NewBooking {
            confirmation_id: Some(Uuid::new_v4()),
            ..booking(6, 600)
        };
        assert_ne!(repo.insert(&user, &fresh).await.unwrap(), first);
        assert_eq!(repo.list_for_user(&user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_history_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("u.json"), "[{").unwrap();
        let repo = JsonBookingRepository::new(temp_dir.path());

        let err = repo
            .insert(&UserId::new("u"), &booking(1, 100))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
    }
}
