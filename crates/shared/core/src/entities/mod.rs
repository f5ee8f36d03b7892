mod alert;
mod price_level;
mod side;
mod snapshot;
mod summary;

pub use alert::Alert;
pub use price_level::PriceLevel;
pub use side::BookSide;
pub use snapshot::{RawSnapshot, Snapshot};
pub use summary::BookSummary;
