//! Cycle output published to observers

use std::sync::Arc;

use depthwatch_core::{Alert, Snapshot, Symbol};

use crate::error::CycleError;

/// Outcome of one completed polling cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub symbol: Symbol,
    pub snapshot: Arc<Snapshot>,
    /// Wall alerts first (bids, asks), then cancellations
    pub alerts: Vec<Alert>,
    /// Whether a comparable previous snapshot was diffed
    pub diffed: bool,
}

impl CycleReport {
    pub fn walls(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.is_wall())
    }

    pub fn cancellations(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.is_cancellation())
    }
}

/// Events broadcast by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    Completed(CycleReport),
    Failed { symbol: Symbol, error: CycleError },
    /// Out-of-band full-state notification sent on resume
    StateSummary { message: String },
}

impl CycleEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, CycleEvent::Failed { .. })
    }
}
