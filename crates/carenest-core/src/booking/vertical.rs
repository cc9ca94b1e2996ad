//! Service verticals and the closed enumerations attached to them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// One service category with its own selection flow.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Vertical {
    Doctor,
    HomeVisit,
    Lab,
    Nurse,
    ElderlyCare,
    Medicine,
}

const DOCTOR_MODES: &[BookingMode] = &[BookingMode::InPerson, BookingMode::Video];
const NURSE_MODES: &[BookingMode] = &[BookingMode::Hourly, BookingMode::Daily];

impl Vertical {
    pub fn label(self) -> &'static str {
        self.into()
    }

    pub fn booking_type(self) -> BookingType {
        match self {
            Vertical::Doctor => BookingType::Doctor,
            Vertical::HomeVisit => BookingType::HomeVisit,
            Vertical::Lab => BookingType::Lab,
            Vertical::Nurse => BookingType::Nurse,
            Vertical::ElderlyCare => BookingType::ElderlyCare,
            Vertical::Medicine => BookingType::Medicine,
        }
    }

    /// Modes this vertical offers. Empty means the vertical has no mode.
    pub fn allowed_modes(self) -> &'static [BookingMode] {
        match self {
            Vertical::Doctor => DOCTOR_MODES,
            Vertical::Nurse => NURSE_MODES,
            _ => &[],
        }
    }

    pub fn requires_mode(self) -> bool {
        !self.allowed_modes().is_empty()
    }

    /// Lab orders are built from tests alone; every other vertical starts
    /// from a catalogue entity.
    pub fn requires_entity(self) -> bool {
        !matches!(self, Vertical::Lab)
    }

    pub fn requires_line_items(self) -> bool {
        matches!(self, Vertical::Lab | Vertical::Nurse | Vertical::Medicine)
    }

    /// Verticals involving physical presence at the patient's address.
    pub fn requires_address(self) -> bool {
        !matches!(self, Vertical::Doctor)
    }

    pub fn requires_patient_info(self) -> bool {
        matches!(self, Vertical::HomeVisit | Vertical::ElderlyCare)
    }

    /// Whether the selected entity itself carries the price, as opposed to
    /// the line items.
    pub fn prices_entity(self) -> bool {
        matches!(
            self,
            Vertical::Doctor | Vertical::HomeVisit | Vertical::ElderlyCare
        )
    }

    pub fn default_provider_name(self) -> &'static str {
        match self {
            Vertical::Lab => "CareNest Diagnostics",
            Vertical::Medicine => "CareNest Pharmacy",
            _ => "CareNest",
        }
    }
}

/// Mutually exclusive consultation or visit mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BookingMode {
    InPerson,
    Video,
    Hourly,
    Daily,
}

impl BookingMode {
    /// Unit used for duration-based pricing, if this mode is one.
    pub fn duration_unit(self) -> Option<&'static str> {
        match self {
            BookingMode::Hourly => Some("hour"),
            BookingMode::Daily => Some("day"),
            _ => None,
        }
    }
}

/// Kind of a durable booking record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BookingType {
    Doctor,
    Medicine,
    Lab,
    Nurse,
    HomeVisit,
    ElderlyCare,
    Emergency,
}

/// Lifecycle status of a booking record. The core only ever writes
/// `Upcoming`; later transitions belong to another collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Upcoming,
    Completed,
    Cancelled,
}
