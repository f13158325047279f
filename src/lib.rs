//! # Staymetrics
//!
//! A hotel occupancy and revenue tracker with ranking analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (hotels, performance records, ids)
//! - **storage**: JSONL-backed repositories (CRUD data access)
//! - **calculate**: Derived metrics (ADR, RevPAR, occupancy) and rankings
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
