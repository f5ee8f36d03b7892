//! Depthwatch Runner - order-book polling orchestration
//!
//! Wires the detection engine to the outside world:
//!
//! - **Scheduler**: the single cycle driver (fetch, bucket, detect, swap)
//! - **Handle**: the control surface (pause/resume, settings, symbol switch)
//! - **Delivery**: ordered, time-bounded notification queue in front of the sink
//! - **Events**: per-cycle reports broadcast to any observer
//! - **Messages**: human-readable alert and summary text
//! - **Config**: startup configuration and pair presets
//!
//! ## Architecture
//!
//! ```text
//!   stdin / UI ──► SchedulerHandle ──┐
//!                                    │ settings, run state, wake
//!                                    ▼
//! MarketDataSource ──► PollingScheduler ──► delivery queue ──► NotificationSink
//!                          │
//!                          └──► broadcast<CycleEvent>
//! ```

pub mod config;
pub mod control;
pub mod delivery;
pub mod error;
pub mod events;
pub mod handle;
pub mod messages;
pub mod scheduler;
pub mod state;

// Re-export main types
pub use config::{ConfigError, RunnerConfig, TelegramConfig};
pub use control::ControlCommand;
pub use error::CycleError;
pub use events::{CycleEvent, CycleReport};
pub use handle::SchedulerHandle;
pub use scheduler::PollingScheduler;
pub use state::{Presets, RunState};
