//! Depthwatch Detector - snapshot aggregation and anomaly detection
//!
//! The engine behind the monitor. Every piece here is synchronous and
//! side-effect free apart from the explicit `&mut WallMemory`:
//!
//! - **Bucketizer**: groups raw `(price, amount)` pairs into fixed-width buckets
//! - **SnapshotStore**: the last completed snapshot, swapped atomically
//! - **WallDetector**: first qualifying large level per side, with cooldown dedup
//! - **CancellationDetector**: previous/current outer join, every drop above threshold
//! - **Settings**: runtime thresholds and their validation rules
//!
//! ## Data flow
//!
//! ```text
//! raw levels ──► bucket() ──► Snapshot ──┬──► WallDetector ─────────┐
//!                                        │                          ├──► alerts
//!               SnapshotStore.previous ──┴──► CancellationDetector ─┘
//! ```

pub mod bucket;
pub mod cancellation;
pub mod error;
pub mod memory;
pub mod settings;
pub mod store;
pub mod wall;

pub use bucket::{bucket, build_snapshot};
pub use cancellation::CancellationDetector;
pub use error::DetectorError;
pub use memory::{WallMemory, WallRecord, price_key};
pub use settings::{MAX_COOLDOWN, PairSettings, Settings, SettingsChange, SettingsUpdate};
pub use store::SnapshotStore;
pub use wall::WallDetector;
