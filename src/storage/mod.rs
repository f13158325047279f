//! JSONL-file storage.
//!
//! Hotels and performance records live as JSONL files under the data
//! directory, one JSON object per line. Repositories layer CRUD on top
//! of the raw files.

pub mod jsonl;
pub mod repository;

pub use jsonl::JsonlStore;
pub use repository::{load_roster, HotelRepository, PerformanceRepository};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn hotels_path(&self) -> PathBuf {
        self.data_dir.join("hotels.jsonl")
    }

    pub fn performance_path(&self) -> PathBuf {
        self.data_dir.join("performance_records.jsonl")
    }

    /// Create the data directory if it is missing.
    pub fn ensure_layout(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
