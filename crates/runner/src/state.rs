//! State shared between the cycle driver and the control surface
//!
//! Each structure sits behind its own lock. Locks are taken for a single
//! read-modify-write and never held across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use depthwatch_core::Symbol;
use depthwatch_detector::{PairSettings, Settings, SnapshotStore, WallMemory};
use tokio::sync::{Notify, broadcast};

use crate::delivery::Notifier;
use crate::events::CycleEvent;

/// Capacity of the cycle event channel
const EVENT_CAPACITY: usize = 256;

/// Whether the scheduler is polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }

    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "running"),
            RunState::Paused => write!(f, "paused"),
        }
    }
}

/// Run state plus the pending full-state summary owed after a resume
#[derive(Debug, Default)]
pub(crate) struct RunControl {
    state: RunState,
    resume_pending: bool,
}

impl RunControl {
    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    /// Move to `next`, returns whether the state actually changed
    pub(crate) fn set(&mut self, next: RunState) -> bool {
        if self.state == next {
            return false;
        }
        self.state = next;
        self.resume_pending = next.is_running();
        true
    }

    /// Current state and whether a resume summary is owed, clearing the latter
    pub(crate) fn take_resume(&mut self) -> (RunState, bool) {
        let pending = std::mem::take(&mut self.resume_pending);
        (self.state, pending && self.state.is_running())
    }
}

/// Per-symbol presets with a global fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presets {
    pairs: HashMap<Symbol, PairSettings>,
    fallback: PairSettings,
}

impl Default for Presets {
    fn default() -> Self {
        Self::new(PairSettings::default())
    }
}

impl Presets {
    pub fn new(fallback: PairSettings) -> Self {
        Self {
            pairs: HashMap::new(),
            fallback,
        }
    }

    pub fn with_pair(mut self, symbol: &str, pair: PairSettings) -> Self {
        self.store(symbol, pair);
        self
    }

    /// Preset for `symbol`, or the fallback when none was stored
    pub fn for_symbol(&self, symbol: &str) -> PairSettings {
        self.get(symbol).unwrap_or(self.fallback)
    }

    pub fn get(&self, symbol: &str) -> Option<PairSettings> {
        self.pairs.get(&symbol.to_ascii_uppercase()).copied()
    }

    pub fn store(&mut self, symbol: &str, pair: PairSettings) {
        self.pairs.insert(symbol.to_ascii_uppercase(), pair);
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.pairs.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

pub(crate) struct Shared {
    pub(crate) settings: Mutex<Settings>,
    pub(crate) control: Mutex<RunControl>,
    pub(crate) presets: Mutex<Presets>,
    pub(crate) memory: Mutex<WallMemory>,
    pub(crate) store: SnapshotStore,
    /// Pulsed to cut the inter-cycle delay short
    pub(crate) wake: Notify,
    pub(crate) events: broadcast::Sender<CycleEvent>,
    pub(crate) notifier: Notifier,
}

impl Shared {
    pub(crate) fn new(settings: Settings, presets: Presets, notifier: Notifier) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            settings: Mutex::new(settings),
            control: Mutex::new(RunControl::default()),
            presets: Mutex::new(presets),
            memory: Mutex::new(WallMemory::new()),
            store: SnapshotStore::new(),
            wake: Notify::new(),
            events,
            notifier,
        }
    }

    pub(crate) fn settings(&self) -> Settings {
        lock(&self.settings).clone()
    }

    pub(crate) fn publish(&self, event: CycleEvent) {
        // No subscriber is fine
        let _ = self.events.send(event);
    }
}

/// Lock, recovering the data from a poisoned mutex
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
