//! Booking domain module.
//!
//! This module contains the booking lifecycle: the per-vertical selection
//! flow holding a mutable draft, the frozen draft handed over at
//! confirmation, and the durable booking record.
//!
//! # Module Structure
//!
//! - `vertical`: `Vertical`, `BookingMode`, `BookingType`, `BookingStatus`
//! - `slot`: fixed time-slot enumeration (`TimeSlot`)
//! - `draft`: `LineItem`, `BookingDraft`, `DraftPatch`, `ConfirmedDraft`
//! - `flow`: selection flow state machine (`SelectionFlow`, `FlowStep`)
//! - `record`: `BookingId`, `NewBooking`, `BookingRecord`, `SaveOutcome`
//! - `repository`: `BookingRepository` trait

mod draft;
mod flow;
mod record;
mod repository;
mod slot;
mod vertical;

pub use draft::{BookingDraft, ConfirmedDraft, DraftPatch, LineItem};
pub use flow::{FlowStep, SelectionFlow};
pub use record::{BookingId, BookingRecord, NewBooking, SaveOutcome};
pub use repository::BookingRepository;
pub use slot::{SLOT_LABELS, TimeSlot};
pub use vertical::{BookingMode, BookingStatus, BookingType, Vertical};
