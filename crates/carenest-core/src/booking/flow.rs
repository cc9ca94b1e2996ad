//! Selection flow state machine.
//!
//! One `SelectionFlow` per vertical screen. It walks
//! `Browsing → EntitySelected → Configuring → Scheduled → Confirmed`,
//! owns the only mutable `BookingDraft`, and reprices the draft whenever a
//! pricing-relevant field changes. Business rules are checked only at
//! `confirm`.

use super::draft::{BookingDraft, ConfirmedDraft, DraftPatch, LineItem};
use super::slot::TimeSlot;
use super::vertical::Vertical;
use crate::catalogue::CatalogueItem;
use crate::error::ValidationError;
use crate::pricing::{PriceBreakdown, PricingResolver};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::Display;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowStep {
    Browsing,
    EntitySelected,
    Configuring,
    Scheduled,
    Confirmed,
}

type FlowResult<T> = std::result::Result<T, ValidationError>;

/// Drives one vertical's booking draft from browsing to confirmation.
#[derive(Debug, Clone)]
pub struct SelectionFlow {
    draft: BookingDraft,
    step: FlowStep,
    resolver: PricingResolver,
    unavailable_slots: HashSet<TimeSlot>,
}

impl SelectionFlow {
    pub fn new(vertical: Vertical, resolver: PricingResolver) -> Self {
        Self {
            draft: BookingDraft::new(vertical),
            step: FlowStep::Browsing,
            resolver,
            unavailable_slots: HashSet::new(),
        }
    }

    pub fn vertical(&self) -> Vertical {
        self.draft.vertical
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn price(&self) -> PriceBreakdown {
        self.draft.price
    }

    pub fn is_confirmed(&self) -> bool {
        self.step == FlowStep::Confirmed
    }

    /// Sets the selected entity. Availability is the catalogue's concern
    /// and is not checked here.
    pub fn select_entity(&mut self, entity: CatalogueItem) -> FlowResult<()> {
        self.ensure_open()?;
        tracing::debug!(
            vertical = %self.vertical(),
            entity_id = %entity.id,
            "entity selected"
        );
        self.draft.selected_entity = Some(entity);
        if self.vertical().prices_entity() {
            self.reprice();
        }
        self.advance_to(FlowStep::EntitySelected);
        Ok(())
    }

    /// Merges `patch` into the draft.
    ///
    /// Only the shape is checked here, plus the rule that a booked-out slot
    /// cannot be selected. Changing the mode keeps the chosen slot, since
    /// every mode shares the same slot enumeration.
    pub fn update(&mut self, patch: DraftPatch) -> FlowResult<()> {
        self.ensure_open()?;
        if let Some(slot) = &patch.time_slot {
            self.ensure_slot_selectable(slot)?;
        }

        let reprice = patch.touches_pricing();
        let schedule = patch.touches_schedule();
        let DraftPatch {
            line_items,
            date,
            time_slot,
            mode,
            duration,
            address,
            patient_info,
            notes,
            coupon_code,
        } = patch;

        if let Some(items) = line_items {
            self.draft.line_items = items;
        }
        if let Some(date) = date {
            self.draft.date = Some(date);
        }
        if let Some(slot) = time_slot {
            self.draft.time_slot = Some(slot);
        }
        if let Some(mode) = mode {
            self.draft.mode = Some(mode);
        }
        if let Some(duration) = duration {
            self.draft.duration = duration;
        }
        if let Some(address) = address {
            self.draft.address = Some(address);
        }
        if let Some(info) = patient_info {
            self.draft.patient_info = Some(info);
        }
        if let Some(notes) = notes {
            self.draft.notes = Some(notes);
        }
        if let Some(code) = coupon_code {
            if self.resolver.coupons().is_valid(&code) {
                self.draft.coupon_code = Some(code);
            } else {
                tracing::debug!(code = %code, "coupon not recognised, keeping previous");
            }
        }

        if reprice {
            self.reprice();
        }
        self.advance_to(if schedule && self.has_schedule() {
            FlowStep::Scheduled
        } else {
            FlowStep::Configuring
        });
        Ok(())
    }

    /// Adds an item, or raises the quantity of one already in the draft.
    pub fn add_item(&mut self, item: LineItem) -> FlowResult<()> {
        self.ensure_open()?;
        match self.draft.line_items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity.max(1))
            }
            None => self.draft.line_items.push(item),
        }
        self.reprice();
        self.advance_to(FlowStep::Configuring);
        Ok(())
    }

    /// Selects the item if absent, deselects it if present.
    pub fn toggle_item(&mut self, item: LineItem) -> FlowResult<()> {
        self.ensure_open()?;
        let before = self.draft.line_items.len();
        self.draft.line_items.retain(|i| i.id != item.id);
        if self.draft.line_items.len() == before {
            self.draft.line_items.push(item);
        }
        self.reprice();
        self.advance_to(FlowStep::Configuring);
        Ok(())
    }

    /// Sets an item's quantity. Zero removes it.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> FlowResult<()> {
        self.ensure_open()?;
        if quantity == 0 {
            self.draft.line_items.retain(|i| i.id != item_id);
        } else if let Some(item) = self.draft.line_items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
        }
        self.reprice();
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: &str) -> FlowResult<()> {
        self.set_quantity(item_id, 0)
    }

    pub fn schedule(&mut self, date: NaiveDate, slot: TimeSlot) -> FlowResult<()> {
        self.update(DraftPatch::new().date(date).time_slot(slot))
    }

    /// Applies a coupon. Returns `false`, leaving the draft untouched, when
    /// the code is not recognised. Re-applying the active code changes
    /// nothing.
    pub fn apply_coupon(&mut self, code: &str) -> FlowResult<bool> {
        self.ensure_open()?;
        if !self.resolver.coupons().is_valid(code) {
            tracing::debug!(code, "coupon not recognised");
            return Ok(false);
        }
        self.draft.coupon_code = Some(code.to_string());
        self.reprice();
        Ok(true)
    }

    pub fn clear_coupon(&mut self) -> FlowResult<()> {
        self.ensure_open()?;
        self.draft.coupon_code = None;
        self.reprice();
        Ok(())
    }

    /// Marks a slot as booked out. It can no longer be selected, and a draft
    /// already holding it will not confirm.
    pub fn mark_unavailable(&mut self, slot: TimeSlot) {
        self.unavailable_slots.insert(slot);
    }

    pub fn is_slot_available(&self, slot: &TimeSlot) -> bool {
        !self.unavailable_slots.contains(slot)
    }

    pub fn available_slots(&self) -> Vec<TimeSlot> {
        TimeSlot::all()
            .filter(|slot| self.is_slot_available(slot))
            .collect()
    }

    /// Re-enters an earlier step. Every field already set is kept.
    pub fn go_back(&mut self, to: FlowStep) -> FlowResult<()> {
        self.ensure_open()?;
        if to < self.step {
            tracing::debug!(from = %self.step, to = %to, "flow stepped back");
            self.step = to;
        }
        Ok(())
    }

    /// Checks every rule required to confirm. UIs use this to disable the
    /// confirm action.
    pub fn validate(&self) -> FlowResult<()> {
        self.ensure_open()?;
        self.check_required().map(|_| ())
    }

    pub fn can_confirm(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validates and freezes the draft. The flow is closed afterwards.
    pub fn confirm(&mut self) -> FlowResult<ConfirmedDraft> {
        self.ensure_open()?;
        let (date, slot) = self.check_required()?;
        let confirmed = ConfirmedDraft::freeze(&self.draft, date, slot);
        self.step = FlowStep::Confirmed;
        tracing::debug!(
            vertical = %self.vertical(),
            confirmation_id = %confirmed.confirmation_id(),
            total = confirmed.price().total,
            "draft confirmed"
        );
        Ok(confirmed)
    }

    fn check_required(&self) -> FlowResult<(NaiveDate, TimeSlot)> {
        let vertical = self.vertical();
        let label = vertical.label();
        let missing = |field| ValidationError::MissingField {
            vertical: label,
            field,
        };

        if vertical.requires_entity() && self.draft.selected_entity.is_none() {
            return Err(missing("selected entity"));
        }
        if vertical.requires_line_items() && self.draft.line_items.is_empty() {
            return Err(ValidationError::NoLineItems { vertical: label });
        }
        if vertical.requires_mode() {
            let mode = self.draft.mode.ok_or_else(|| missing("mode"))?;
            if !vertical.allowed_modes().contains(&mode) {
                return Err(ValidationError::ModeNotAllowed {
                    vertical: label,
                    mode: mode.to_string(),
                });
            }
            if let Some(unit) = mode.duration_unit() {
                if self.draft.duration == 0 {
                    return Err(ValidationError::InvalidDuration { unit });
                }
            }
        } else if let Some(mode) = self.draft.mode {
            return Err(ValidationError::ModeNotAllowed {
                vertical: label,
                mode: mode.to_string(),
            });
        }

        let date = self.draft.date.ok_or_else(|| missing("date"))?;
        let slot = self.draft.time_slot.clone().ok_or_else(|| missing("time slot"))?;
        self.ensure_slot_selectable(&slot)?;

        if vertical.requires_address() && is_blank(self.draft.address.as_deref()) {
            return Err(missing("address"));
        }
        if vertical.requires_patient_info() && is_blank(self.draft.patient_info.as_deref()) {
            return Err(missing("patient info"));
        }

        Ok((date, slot))
    }

    fn ensure_open(&self) -> FlowResult<()> {
        if self.is_confirmed() {
            Err(ValidationError::AlreadyConfirmed)
        } else {
            Ok(())
        }
    }

    fn ensure_slot_selectable(&self, slot: &TimeSlot) -> FlowResult<()> {
        if self.is_slot_available(slot) {
            Ok(())
        } else {
            Err(ValidationError::SlotUnavailable(slot.label().to_string()))
        }
    }

    fn has_schedule(&self) -> bool {
        self.draft.date.is_some() && self.draft.time_slot.is_some()
    }

    fn advance_to(&mut self, step: FlowStep) {
        if step > self.step {
            self.step = step;
        }
    }

    fn reprice(&mut self) {
        let items = self.draft.priced_items();
        self.draft.price = self.resolver.compute_total(
            &items,
            self.draft.pricing_mode(),
            self.draft.coupon_code.as_deref(),
        );
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
