//! Performance record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, HotelId, PerformanceId};

/// A single occupancy/revenue record for a hotel.
///
/// Inputs are taken as reported: `sold_rooms` is semantically bounded by
/// `available_rooms` and `revenue` is semantically non-negative, but
/// neither is enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Unique identifier
    pub id: PerformanceId,

    /// Hotel this record belongs to
    pub hotel_id: HotelId,

    /// Rooms available for sale in the reporting period
    pub available_rooms: u32,

    /// Rooms actually sold
    pub sold_rooms: u32,

    /// Revenue for the period
    pub revenue: f64,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    /// When this record was last modified
    pub updated_at: DateTime<Utc>,
}

impl PerformanceRecord {
    /// Create a new record with a fresh random ID.
    pub fn new(hotel_id: HotelId, available_rooms: u32, sold_rooms: u32, revenue: f64) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::random(),
            hotel_id,
            available_rooms,
            sold_rooms,
            revenue,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a performance record. Absent fields are left
/// untouched; applying a patch refreshes `updated_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformancePatch {
    pub hotel_id: Option<HotelId>,
    pub available_rooms: Option<u32>,
    pub sold_rooms: Option<u32>,
    pub revenue: Option<f64>,
}

impl PerformancePatch {
    /// Apply this patch to a record in place.
    pub fn apply(&self, record: &mut PerformanceRecord) {
        if let Some(hotel_id) = &self.hotel_id {
            record.hotel_id = hotel_id.clone();
        }
        if let Some(available_rooms) = self.available_rooms {
            record.available_rooms = available_rooms;
        }
        if let Some(sold_rooms) = self.sold_rooms {
            record.sold_rooms = sold_rooms;
        }
        if let Some(revenue) = self.revenue {
            record.revenue = revenue;
        }
        record.updated_at = Utc::now();
    }
}
