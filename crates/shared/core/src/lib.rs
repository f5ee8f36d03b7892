//! Depthwatch Core Domain
//!
//! Pure domain types for the depthwatch order-book monitor.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Alert, BookSide, BookSummary, PriceLevel, RawSnapshot, Snapshot};
pub use values::{Price, Quantity, Symbol, Timestamp, format_fixed};
