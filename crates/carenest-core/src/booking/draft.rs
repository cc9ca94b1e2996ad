//! Booking drafts.
//!
//! A `BookingDraft` is owned by exactly one `SelectionFlow` and mutated
//! field by field. Confirming freezes it into a `ConfirmedDraft`, which is
//! immutable and is what the persistence gateway consumes.

use super::record::NewBooking;
use super::slot::TimeSlot;
use super::vertical::{BookingMode, BookingStatus, Vertical};
use crate::catalogue::CatalogueItem;
use crate::pricing::{PriceBreakdown, PricingMode, Rupees};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A selected add-on: nursing service, lab test or cart medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<Rupees>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Rupees) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            discount_price: None,
            price_per_hour: None,
            price_per_day: None,
            quantity: 1,
        }
    }

    pub fn with_discount_price(mut self, discount_price: Rupees) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    pub fn with_duration_prices(mut self, per_hour: Rupees, per_day: Rupees) -> Self {
        self.price_per_hour = Some(per_hour);
        self.price_per_day = Some(per_day);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn effective_price(&self) -> Rupees {
        self.discount_price.unwrap_or(self.price)
    }
}

/// In-progress booking state for one vertical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub vertical: Vertical,
    pub selected_entity: Option<CatalogueItem>,
    pub line_items: Vec<LineItem>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    /// Exactly one active value for verticals that offer modes.
    pub mode: Option<BookingMode>,
    /// Hours or days when the mode is duration-based.
    pub duration: u32,
    pub address: Option<String>,
    pub patient_info: Option<String>,
    pub notes: Option<String>,
    pub coupon_code: Option<String>,
    pub price: PriceBreakdown,
}

impl BookingDraft {
    /// An empty draft. Verticals with modes start on their first mode.
    pub fn new(vertical: Vertical) -> Self {
        Self {
            vertical,
            selected_entity: None,
            line_items: Vec::new(),
            date: None,
            time_slot: None,
            mode: vertical.allowed_modes().first().copied(),
            duration: 1,
            address: None,
            patient_info: None,
            notes: None,
            coupon_code: None,
            price: PriceBreakdown::default(),
        }
    }

    pub fn pricing_mode(&self) -> PricingMode {
        PricingMode::from_booking_mode(self.mode, self.duration)
    }

    /// Items that make up the price. Entity-priced verticals charge for the
    /// selected entity itself.
    pub fn priced_items(&self) -> Vec<LineItem> {
        if self.vertical.prices_entity() {
            return self
                .selected_entity
                .iter()
                .map(|entity| entity.to_line_item(1))
                .collect();
        }
        self.line_items.clone()
    }
}

/// Partial update merged into a draft by `SelectionFlow::update`.
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub line_items: Option<Vec<LineItem>>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub mode: Option<BookingMode>,
    pub duration: Option<u32>,
    pub address: Option<String>,
    pub patient_info: Option<String>,
    pub notes: Option<String>,
    pub coupon_code: Option<String>,
}

impl DraftPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_items(mut self, items: Vec<LineItem>) -> Self {
        self.line_items = Some(items);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn time_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slot = Some(slot);
        self
    }

    pub fn mode(mut self, mode: BookingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn patient_info(mut self, info: impl Into<String>) -> Self {
        self.patient_info = Some(info.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn coupon_code(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    pub fn touches_pricing(&self) -> bool {
        self.line_items.is_some()
            || self.mode.is_some()
            || self.duration.is_some()
            || self.coupon_code.is_some()
    }

    pub fn touches_schedule(&self) -> bool {
        self.date.is_some() || self.time_slot.is_some()
    }
}

/// A validated, immutable draft ready for persistence.
///
/// Only `SelectionFlow::confirm` creates one. The `confirmation_id` is
/// carried onto the record so a store can recognise a repeated save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedDraft {
    confirmation_id: Uuid,
    vertical: Vertical,
    entity: Option<CatalogueItem>,
    line_items: Vec<LineItem>,
    date: NaiveDate,
    time_slot: TimeSlot,
    mode: Option<BookingMode>,
    duration: u32,
    address: Option<String>,
    patient_info: Option<String>,
    notes: Option<String>,
    coupon_code: Option<String>,
    price: PriceBreakdown,
}

impl ConfirmedDraft {
    /// Freezes a draft already checked by the flow's validation.
    pub(crate) fn freeze(draft: &BookingDraft, date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self {
            confirmation_id: Uuid::new_v4(),
            vertical: draft.vertical,
            entity: draft.selected_entity.clone(),
            line_items: draft.line_items.clone(),
            date,
            time_slot,
            mode: draft.mode,
            duration: draft.duration,
            address: non_blank(draft.address.as_deref()),
            patient_info: non_blank(draft.patient_info.as_deref()),
            notes: non_blank(draft.notes.as_deref()),
            coupon_code: draft.coupon_code.clone(),
            price: draft.price,
        }
    }

    pub fn confirmation_id(&self) -> Uuid {
        self.confirmation_id
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn entity(&self) -> Option<&CatalogueItem> {
        self.entity.as_ref()
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time_slot(&self) -> &TimeSlot {
        &self.time_slot
    }

    pub fn mode(&self) -> Option<BookingMode> {
        self.mode
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn patient_info(&self) -> Option<&str> {
        self.patient_info.as_deref()
    }

    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    pub fn price(&self) -> PriceBreakdown {
        self.price
    }

    pub fn provider_name(&self) -> String {
        self.entity
            .as_ref()
            .map(|entity| entity.name.clone())
            .unwrap_or_else(|| self.vertical.default_provider_name().to_string())
    }

    pub fn title(&self) -> String {
        let provider = self.provider_name();
        let item_names = || {
            self.line_items
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self.vertical {
            Vertical::Doctor if self.mode == Some(BookingMode::Video) => {
                format!("Video consultation with {}", provider)
            }
            Vertical::Doctor => format!("Consultation with {}", provider),
            Vertical::HomeVisit => format!("Home visit by {}", provider),
            Vertical::Lab => format!("Lab tests: {}", item_names()),
            Vertical::Nurse => format!("Nursing care: {}", item_names()),
            Vertical::ElderlyCare => format!("Elderly care: {}", provider),
            Vertical::Medicine => {
                let count: u32 = self.line_items.iter().map(|item| item.quantity).sum();
                format!("Medicine order ({} items)", count)
            }
        }
    }

    fn record_notes(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(info) = &self.patient_info {
            parts.push(format!("Patient: {}", info));
        }
        if let Some(unit) = self.mode.and_then(BookingMode::duration_unit) {
            let plural = if self.duration == 1 { "" } else { "s" };
            parts.push(format!("Duration: {} {}{}", self.duration, unit, plural));
        }
        if let Some(code) = &self.coupon_code {
            parts.push(format!("Coupon: {}", code.to_uppercase()));
        }
        if let Some(notes) = &self.notes {
            parts.push(notes.clone());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    /// Canonical record content for this confirmation.
    pub fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            booking_type: self.vertical.booking_type(),
            title: self.title(),
            provider_name: self.provider_name(),
            booking_date: self.date,
            booking_time: self.time_slot.label().to_string(),
            amount: self.price.total,
            location: self.address.clone(),
            notes: self.record_notes(),
            status: BookingStatus::Upcoming,
            confirmation_id: Some(self.confirmation_id),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
