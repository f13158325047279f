pub mod admin;
pub mod analytics;
pub mod hotels;
pub mod performance;
