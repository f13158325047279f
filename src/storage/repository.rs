//! CRUD repositories over JSONL stores.
//!
//! Mutations rewrite the whole backing file under a write lock; reads
//! take the read side, so a concurrent rewrite is never observed
//! half-done. The analytics layer only consumes the read operations.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use super::{JsonlStore, StorageConfig, StorageError};
use crate::models::{
    Hotel, HotelId, HotelPatch, PerformanceId, PerformancePatch, PerformanceRecord,
};

/// Hotel CRUD repository.
pub struct HotelRepository {
    store: JsonlStore<Hotel>,
    lock: RwLock<()>,
}

impl HotelRepository {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            store: JsonlStore::new(config.hotels_path()),
            lock: RwLock::new(()),
        }
    }

    /// Persist a new hotel.
    pub async fn create(&self, hotel: Hotel) -> Result<Hotel, StorageError> {
        let _guard = self.lock.write().await;
        self.store.append(&hotel)?;
        Ok(hotel)
    }

    /// All hotels in storage (insertion) order.
    pub async fn find_all(&self) -> Result<Vec<Hotel>, StorageError> {
        let _guard = self.lock.read().await;
        self.store.read_all()
    }

    pub async fn find_by_id(&self, id: &HotelId) -> Result<Option<Hotel>, StorageError> {
        let _guard = self.lock.read().await;
        Ok(self.store.read_all()?.into_iter().find(|h| &h.id == id))
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.read().await;
        self.store.count()
    }

    /// Apply a partial update. Returns the updated hotel, or `None` when
    /// the id is unknown.
    pub async fn update(
        &self,
        id: &HotelId,
        patch: &HotelPatch,
    ) -> Result<Option<Hotel>, StorageError> {
        let _guard = self.lock.write().await;
        let mut hotels = self.store.read_all()?;
        let Some(hotel) = hotels.iter_mut().find(|h| &h.id == id) else {
            return Ok(None);
        };
        patch.apply(hotel);
        let updated = hotel.clone();
        self.store.write_all(&hotels)?;
        Ok(Some(updated))
    }

    /// Replace a hotel wholesale, keeping its id and position.
    pub async fn replace(
        &self,
        id: &HotelId,
        mut hotel: Hotel,
    ) -> Result<Option<Hotel>, StorageError> {
        let _guard = self.lock.write().await;
        let mut hotels = self.store.read_all()?;
        let Some(slot) = hotels.iter_mut().find(|h| &h.id == id) else {
            return Ok(None);
        };
        hotel.id = id.clone();
        *slot = hotel.clone();
        self.store.write_all(&hotels)?;
        Ok(Some(hotel))
    }

    /// Delete by id. Returns `true` when something was removed.
    pub async fn delete(&self, id: &HotelId) -> Result<bool, StorageError> {
        let _guard = self.lock.write().await;
        let mut hotels = self.store.read_all()?;
        let before = hotels.len();
        hotels.retain(|h| &h.id != id);
        if hotels.len() == before {
            return Ok(false);
        }
        self.store.write_all(&hotels)?;
        Ok(true)
    }

    /// Rewrite the backing file, dropping lines that no longer parse.
    /// Returns the number of surviving hotels.
    pub async fn compact(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.write().await;
        let hotels = self.store.read_all()?;
        let count = self.store.write_all(&hotels)?;
        info!("Compacted hotel store: {} entries", count);
        Ok(count)
    }
}

/// Performance record CRUD repository.
pub struct PerformanceRepository {
    store: JsonlStore<PerformanceRecord>,
    lock: RwLock<()>,
}

impl PerformanceRepository {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            store: JsonlStore::new(config.performance_path()),
            lock: RwLock::new(()),
        }
    }

    /// Persist a new record.
    pub async fn create(&self, record: PerformanceRecord) -> Result<PerformanceRecord, StorageError> {
        let _guard = self.lock.write().await;
        self.store.append(&record)?;
        Ok(record)
    }

    /// All records in storage (insertion) order.
    pub async fn find_all(&self) -> Result<Vec<PerformanceRecord>, StorageError> {
        let _guard = self.lock.read().await;
        self.store.read_all()
    }

    pub async fn find_by_id(
        &self,
        id: &PerformanceId,
    ) -> Result<Option<PerformanceRecord>, StorageError> {
        let _guard = self.lock.read().await;
        Ok(self.store.read_all()?.into_iter().find(|r| &r.id == id))
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.read().await;
        self.store.count()
    }

    /// All records belonging to one hotel, in storage order. Unknown
    /// hotel ids simply match nothing.
    pub async fn for_hotel(&self, hotel_id: &HotelId) -> Result<Vec<PerformanceRecord>, StorageError> {
        let _guard = self.lock.read().await;
        self.store.read_where(|r| &r.hotel_id == hotel_id)
    }

    /// Apply a partial update. Returns the updated record, or `None`
    /// when the id is unknown.
    pub async fn update(
        &self,
        id: &PerformanceId,
        patch: &PerformancePatch,
    ) -> Result<Option<PerformanceRecord>, StorageError> {
        let _guard = self.lock.write().await;
        let mut records = self.store.read_all()?;
        let Some(record) = records.iter_mut().find(|r| &r.id == id) else {
            return Ok(None);
        };
        patch.apply(record);
        let updated = record.clone();
        self.store.write_all(&records)?;
        Ok(Some(updated))
    }

    /// Delete by id. Returns `true` when something was removed.
    pub async fn delete(&self, id: &PerformanceId) -> Result<bool, StorageError> {
        let _guard = self.lock.write().await;
        let mut records = self.store.read_all()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.store.write_all(&records)?;
        Ok(true)
    }

    /// Delete every record for one hotel. Returns how many were removed.
    pub async fn delete_for_hotel(&self, hotel_id: &HotelId) -> Result<usize, StorageError> {
        let _guard = self.lock.write().await;
        let mut records = self.store.read_all()?;
        let before = records.len();
        records.retain(|r| &r.hotel_id != hotel_id);
        let removed = before - records.len();
        if removed > 0 {
            self.store.write_all(&records)?;
        }
        Ok(removed)
    }

    /// Rewrite the backing file, dropping lines that no longer parse.
    /// Returns the number of surviving records.
    pub async fn compact(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.write().await;
        let records = self.store.read_all()?;
        let count = self.store.write_all(&records)?;
        info!("Compacted performance store: {} entries", count);
        Ok(count)
    }
}

/// Load every hotel with its attached records, in hotel storage order.
///
/// This is the roster the ranking engine consumes; record order within a
/// hotel is storage order.
pub async fn load_roster(
    hotels: &HotelRepository,
    performance: &PerformanceRepository,
) -> Result<Vec<(Hotel, Vec<PerformanceRecord>)>, StorageError> {
    let hotels = hotels.find_all().await?;
    let records = performance.find_all().await?;

    let mut by_hotel: HashMap<String, Vec<PerformanceRecord>> = HashMap::new();
    for record in records {
        by_hotel
            .entry(record.hotel_id.as_str().to_string())
            .or_default()
            .push(record);
    }

    Ok(hotels
        .into_iter()
        .map(|hotel| {
            let records = by_hotel.remove(hotel.id.as_str()).unwrap_or_default();
            (hotel, records)
        })
        .collect())
}
