//! Shared helpers with no domain knowledge of their own.

pub mod single_flight;

// Re-export at module level for the common call sites
pub use single_flight::SingleFlight;
