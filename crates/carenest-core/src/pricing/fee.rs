//! Delivery and collection fees.

use super::Rupees;
use serde::{Deserialize, Serialize};

/// A flat fee waived once the subtotal reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeePolicy {
    pub flat_fee: Rupees,
    /// Subtotal at or above which the fee is waived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_threshold: Option<Rupees>,
}

impl FeePolicy {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn flat(flat_fee: Rupees) -> Self {
        Self {
            flat_fee,
            free_threshold: None,
        }
    }

    pub fn waived_from(mut self, threshold: Rupees) -> Self {
        self.free_threshold = Some(threshold);
        self
    }

    /// Fee owed for `subtotal`. An empty order owes nothing.
    pub fn fee_for(&self, subtotal: Rupees) -> Rupees {
        if subtotal == 0 {
            return 0;
        }
        match self.free_threshold {
            Some(threshold) if subtotal >= threshold => 0,
            _ => self.flat_fee,
        }
    }
}
