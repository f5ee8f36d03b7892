//! Polling Scheduler - the single cycle driver
//!
//! One task owns the loop: fetch, bucket, detect, swap, queue alerts, sleep.
//! A cycle never overlaps the next one, and the control surface only ever
//! touches the shared state between lock acquisitions. Alerts go to the
//! delivery queue, so a slow sink never holds up the next fetch.
//!
//! ## Cycle
//!
//! ```text
//! settings ─► fetch ─► decode ─► bucket ─► walls ──────────┐
//!                                   │                      ├─► alerts ─► queue ─► sink
//!                     store.previous┴─► cancellations ─────┘
//!                                   └─► store.replace(current)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use depthwatch_clock::UniformJitter;
use depthwatch_core::{Alert, BookSummary, Snapshot, Symbol};
use depthwatch_detector::{
    CancellationDetector, PairSettings, Settings, WallDetector, build_snapshot,
};
use depthwatch_ports::{Clock, Jitter, MarketDataSource, NotificationSink, decode_levels};
use tokio::sync::{broadcast, watch};

use crate::delivery::{DELIVERY_TIMEOUT, Notifier};
use crate::error::CycleError;
use crate::events::{CycleEvent, CycleReport};
use crate::handle::SchedulerHandle;
use crate::messages;
use crate::state::{Presets, RunState, Shared, lock};

/// Binance's deepest REST snapshot
pub const DEFAULT_DEPTH_LIMIT: u32 = 5000;

/// Shortest time a wall record is kept after its last notification
const MIN_WALL_RETENTION: Duration = Duration::from_secs(60);

/// Consecutive fetch failures, logged once per streak
#[derive(Debug, Default)]
struct FailureStreak {
    count: u32,
    last: Option<String>,
}

impl FailureStreak {
    fn failed(&mut self, symbol: &str, error: &CycleError) {
        self.count += 1;
        let message = error.to_string();
        if self.last.as_deref() == Some(message.as_str()) {
            log::debug!(
                "{} cycle failed again ({} in a row): {}",
                symbol,
                self.count,
                message
            );
        } else {
            log::error!("{} cycle failed: {}", symbol, message);
            self.last = Some(message);
        }
    }

    fn succeeded(&mut self, symbol: &str) {
        if self.count > 0 {
            log::info!("{} recovered after {} failed cycles", symbol, self.count);
        }
        *self = Self::default();
    }
}

/// Drives fetch -> aggregate -> detect cycles for the active symbol
pub struct PollingScheduler {
    shared: Arc<Shared>,
    source: Arc<dyn MarketDataSource>,
    clock: Arc<dyn Clock>,
    jitter: Arc<dyn Jitter>,
    depth_limit: u32,
    failures: FailureStreak,
}

impl PollingScheduler {
    /// Must be called within a Tokio runtime, which runs the delivery task
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        settings: Settings,
    ) -> Self {
        let notifier = Notifier::spawn(sink, DELIVERY_TIMEOUT);
        Self {
            shared: Arc::new(Shared::new(settings, Presets::default(), notifier)),
            source,
            clock,
            jitter: Arc::new(UniformJitter::default()),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            failures: FailureStreak::default(),
        }
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: u32) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_presets(self, presets: Presets) -> Self {
        *lock(&self.shared.presets) = presets;
        self
    }

    /// Shortcut for presets built from a plain map
    pub fn with_pairs(self, pairs: HashMap<Symbol, PairSettings>, fallback: PairSettings) -> Self {
        let presets = pairs
            .into_iter()
            .fold(Presets::new(fallback), |presets, (symbol, pair)| {
                presets.with_pair(&symbol, pair)
            });
        self.with_presets(presets)
    }

    /// Control surface sharing this scheduler's state
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(self.shared.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CycleEvent> {
        self.shared.events.subscribe()
    }

    pub fn depth_limit(&self) -> u32 {
        self.depth_limit
    }

    /// Wait until every notification queued so far has been handled
    pub async fn flush_notifications(&self) {
        self.shared.notifier.flush().await;
    }

    /// Run until `shutdown` turns true (or its sender is dropped)
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Polling scheduler started for {} (clock: {})",
            self.shared.settings().active_symbol,
            self.clock.name()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let (state, resume_pending) = lock(&self.shared.control).take_resume();
            if state == RunState::Paused {
                tokio::select! {
                    _ = self.shared.wake.notified() => {}
                    changed = shutdown.changed() => if changed.is_err() { break },
                }
                continue;
            }

            if resume_pending {
                self.send_full_state().await;
            }

            // Errors are already logged and published
            let _ = self.run_cycle().await;

            let delay = self.jitter.next_delay();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shared.wake.notified() => {
                    log::debug!("Inter-cycle delay cut short");
                }
                changed = shutdown.changed() => if changed.is_err() { break },
            }
        }

        self.flush_notifications().await;
        log::info!("Polling scheduler stopped");
    }

    /// Execute one cycle, regardless of the run state
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let settings = self.shared.settings();
        let symbol = settings.active_symbol.clone();

        match self.poll(&settings).await {
            Ok(report) => {
                self.failures.succeeded(&symbol);
                self.deliver(&report.alerts);
                self.shared.publish(CycleEvent::Completed(report.clone()));
                Ok(report)
            }
            Err(error) => {
                self.failures.failed(&symbol, &error);
                self.shared.publish(CycleEvent::Failed {
                    symbol,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Fetch once and notify a top-of-book summary
    pub async fn send_full_state(&self) -> String {
        let settings = self.shared.settings();
        let message = match self.fetch_snapshot(&settings).await {
            Ok(snapshot) => messages::state_message(&snapshot),
            Err(error) => {
                log::warn!(
                    "Full-state fetch for {} failed: {}",
                    settings.active_symbol,
                    error
                );
                messages::NO_DATA.to_string()
            }
        };

        self.shared.notifier.send(message.as_str());
        self.shared.publish(CycleEvent::StateSummary {
            message: message.clone(),
        });
        message
    }

    async fn poll(&self, settings: &Settings) -> Result<CycleReport, CycleError> {
        let current = Arc::new(self.fetch_snapshot(settings).await?);
        let now = self.clock.now();

        let mut alerts = {
            let wall_detector =
                WallDetector::new(settings.large_wall_threshold, settings.notification_cooldown);
            let retention = settings
                .notification_cooldown
                .saturating_mul(4)
                .max(MIN_WALL_RETENTION);

            let mut memory = lock(&self.shared.memory);
            memory.prune(now, retention);
            wall_detector.detect_snapshot(&current, &mut memory, now)
        };

        // A snapshot from another symbol or bucketing is never diffed
        let previous = self
            .shared
            .store
            .previous()
            .filter(|previous| previous.is_comparable(&current));
        let diffed = previous.is_some();
        if let Some(previous) = previous {
            let cancellation_detector = CancellationDetector::new(settings.cancellation_threshold);
            alerts.extend(cancellation_detector.detect_snapshots(&previous, &current));
        }

        self.shared.store.replace(current.clone());

        match BookSummary::from_snapshot(&current) {
            Some(summary) => log::info!(
                "{} {}",
                current.symbol(),
                summary.to_string().replace('\n', ", ")
            ),
            None => log::info!(
                "{} order book has an empty side or out-of-range totals",
                current.symbol()
            ),
        }

        Ok(CycleReport {
            symbol: current.symbol().to_string(),
            snapshot: current,
            alerts,
            diffed,
        })
    }

    async fn fetch_snapshot(&self, settings: &Settings) -> Result<Snapshot, CycleError> {
        let raw = self
            .source
            .fetch(&settings.active_symbol, self.depth_limit)
            .await?;

        let bids = decode_levels(&raw.bids)?;
        let asks = decode_levels(&raw.asks)?;

        Ok(build_snapshot(
            &settings.active_symbol,
            settings.bucket_width,
            &bids,
            &asks,
        )?)
    }

    fn deliver(&self, alerts: &[Alert]) {
        for alert in alerts {
            self.shared.notifier.send(messages::alert_message(alert));
        }
    }
}
