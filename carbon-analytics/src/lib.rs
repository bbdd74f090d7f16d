//! Carbon-intensity analytics over an in-memory table of per-country readings.
//!
//! Everything here is synchronous and pure: each operation takes an immutable
//! [`CarbonTable`] snapshot, or values derived from one, and returns new values.

pub mod analytics;
pub mod domain;
pub mod error;
pub mod table;

pub use error::CarbonError;
pub use table::CarbonTable;
