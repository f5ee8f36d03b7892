use serde::{Deserialize, Serialize};

use super::side::BookSide;
use crate::values::{Price, Quantity};

/// Anomaly flagged by one of the detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    /// Large resting amount at a single aggregated level
    Wall {
        side: BookSide,
        price: Price,
        amount: Quantity,
    },
    /// Sharp drop of resting amount between two consecutive snapshots
    Cancellation {
        side: BookSide,
        price: Price,
        cancelled_amount: Quantity,
    },
}

impl Alert {
    pub fn side(&self) -> BookSide {
        match self {
            Alert::Wall { side, .. } | Alert::Cancellation { side, .. } => *side,
        }
    }

    pub fn price(&self) -> Price {
        match self {
            Alert::Wall { price, .. } | Alert::Cancellation { price, .. } => *price,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Alert::Wall { .. })
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Alert::Cancellation { .. })
    }
}
