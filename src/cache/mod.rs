// Cache module for the payment-status aggregates.
// Tiered freshness in memory, mirrored to a local JSON snapshot.

pub mod clock;
pub mod paths;
pub mod snapshot;
pub mod status;

pub use snapshot::{FileSnapshot, NoSnapshot, write_atomic};
pub use status::{Freshness, FreshnessWindows, StatusCache};
