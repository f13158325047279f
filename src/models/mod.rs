//! Core data models for the tracker.

mod hotel;
mod ids;
mod performance;

pub use hotel::*;
pub use ids::*;
pub use performance::*;
