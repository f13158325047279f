use std::sync::Arc;

use crate::storage::{HotelRepository, PerformanceRepository, StorageConfig};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub hotels: Arc<HotelRepository>,
    pub performance: Arc<PerformanceRepository>,
    pub api_token: Option<Arc<String>>,
}

impl AppState {
    /// Build application state over a storage config.
    pub fn new(storage: StorageConfig, api_token: Option<String>) -> Self {
        let hotels = HotelRepository::new(&storage);
        let performance = PerformanceRepository::new(&storage);
        Self {
            storage: Arc::new(storage),
            hotels: Arc::new(hotels),
            performance: Arc::new(performance),
            api_token: api_token.map(Arc::new),
        }
    }
}
