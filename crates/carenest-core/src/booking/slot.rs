//! Fixed time-slot enumeration.

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Slot labels offered by every vertical. Both consultation modes share
/// the same enumeration.
pub const SLOT_LABELS: [&str; 9] = [
    "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
    "05:00 PM", "06:00 PM",
];

/// A slot label drawn from [`SLOT_LABELS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct TimeSlot(&'static str);

impl TimeSlot {
    /// Parses a slot label, ignoring surrounding whitespace and case.
    pub fn parse(label: &str) -> Result<Self, ValidationError> {
        let wanted = label.trim();
        SLOT_LABELS
            .iter()
            .find(|known| known.eq_ignore_ascii_case(wanted))
            .map(|known| TimeSlot(*known))
            .ok_or_else(|| ValidationError::UnknownSlot(label.to_string()))
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        SLOT_LABELS.iter().map(|label| TimeSlot(*label))
    }

    pub fn label(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        TimeSlot::parse(&label).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeSlot::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.0.to_string()
    }
}
