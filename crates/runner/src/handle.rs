//! Control surface for a running scheduler
//!
//! Cloneable and safe to use from any task. Every mutation is a single
//! lock-guarded read-modify-write followed by side effects (store reset,
//! wake-up, notices) with no lock held. Notices go through the scheduler's
//! delivery queue and are never awaited here.

use std::sync::Arc;

use depthwatch_detector::{DetectorError, Settings, SettingsChange, SettingsUpdate};
use tokio::sync::broadcast;

use crate::events::CycleEvent;
use crate::messages;
use crate::state::{Presets, RunState, Shared, lock};

#[derive(Clone)]
pub struct SchedulerHandle {
    shared: Arc<Shared>,
}

impl SchedulerHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub fn settings(&self) -> Settings {
        self.shared.settings()
    }

    pub fn run_state(&self) -> RunState {
        lock(&self.shared.control).state()
    }

    pub fn presets(&self) -> Presets {
        lock(&self.shared.presets).clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CycleEvent> {
        self.shared.events.subscribe()
    }

    /// Whether a previous snapshot is waiting to be diffed
    pub fn has_previous_snapshot(&self) -> bool {
        self.shared.store.has_previous()
    }

    /// Wait until every notification queued so far has been handled
    pub async fn flush_notifications(&self) {
        self.shared.notifier.flush().await;
    }

    /// Flip between running and paused, returns the new state
    pub fn toggle(&self) -> RunState {
        let next = {
            let mut control = lock(&self.shared.control);
            let next = control.state().toggled();
            control.set(next);
            next
        };
        self.announce(next);
        next
    }

    pub fn pause(&self) -> bool {
        self.set_run_state(RunState::Paused)
    }

    /// Resume polling; the scheduler sends a full-state summary first
    pub fn resume(&self) -> bool {
        self.set_run_state(RunState::Running)
    }

    fn set_run_state(&self, next: RunState) -> bool {
        let changed = lock(&self.shared.control).set(next);
        if changed {
            self.announce(next);
        }
        changed
    }

    fn announce(&self, state: RunState) {
        log::info!("Order book updates {}", state);
        let notice = match state {
            RunState::Running => {
                self.shared.wake.notify_one();
                messages::RESUMED_NOTICE
            }
            RunState::Paused => messages::STOPPED_NOTICE,
        };
        self.shared.notifier.send(notice);
    }

    /// Validate and apply a partial settings change
    ///
    /// The resulting pair settings are saved as the active symbol's preset.
    /// A rejected update leaves everything untouched.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, DetectorError> {
        let (next, change) = self.apply(&update)?;

        if !change.is_empty() {
            lock(&self.shared.presets).store(&next.active_symbol, next.pair());
        }
        self.after_change(&next, &change);
        Ok(next)
    }

    /// Make `symbol` the active symbol, loading its preset
    ///
    /// Symbols without a preset get the fallback pair settings. Switching to
    /// the symbol already active changes nothing.
    pub fn switch_symbol(&self, symbol: &str) -> Result<Settings, DetectorError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let pair = lock(&self.shared.presets).for_symbol(&symbol);

        let (next, change) = {
            let mut settings = lock(&self.shared.settings);
            if settings.active_symbol == symbol {
                return Ok(settings.clone());
            }
            let next = settings.apply(&SettingsUpdate::from_pair(pair).active_symbol(symbol))?;
            let change = settings.change_to(&next);
            *settings = next.clone();
            (next, change)
        };

        self.after_change(&next, &change);
        Ok(next)
    }

    fn apply(&self, update: &SettingsUpdate) -> Result<(Settings, SettingsChange), DetectorError> {
        let mut settings = lock(&self.shared.settings);
        let next = settings.apply(update)?;
        let change = settings.change_to(&next);
        *settings = next.clone();
        Ok((next, change))
    }

    fn after_change(&self, next: &Settings, change: &SettingsChange) {
        if change.is_empty() {
            return;
        }

        if change.invalidates_snapshot() {
            self.shared.store.clear();
            log::debug!("Cleared previous snapshot");
        }
        log::info!(
            "Settings: {} width {} wall {} cancel {} cooldown {}s",
            next.active_symbol,
            next.bucket_width,
            next.large_wall_threshold,
            next.cancellation_threshold,
            next.notification_cooldown.as_secs()
        );

        if change.symbol {
            self.shared
                .notifier
                .send(messages::switching_notice(&next.active_symbol));
        }
        if change.bucket_width {
            self.shared
                .notifier
                .send(messages::group_interval_notice(next.bucket_width));
        }

        if change.invalidates_snapshot() {
            self.shared.wake.notify_one();
        }
    }
}
