//! Hotel model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, HotelId};

/// A tracked hotel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique identifier
    pub id: HotelId,

    /// Display name
    pub name: String,

    /// Location (city, country)
    pub location: String,

    /// Total room capacity
    pub rooms: u32,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Hotel {
    /// Create a new Hotel with a fresh random ID.
    pub fn new(name: String, location: String, rooms: u32) -> Self {
        Self {
            id: EntityId::random(),
            name,
            location,
            rooms,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a hotel. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub rooms: Option<u32>,
}

impl HotelPatch {
    /// Apply this patch to a hotel in place.
    pub fn apply(&self, hotel: &mut Hotel) {
        if let Some(name) = &self.name {
            hotel.name = name.clone();
        }
        if let Some(location) = &self.location {
            hotel.location = location.clone();
        }
        if let Some(rooms) = self.rooms {
            hotel.rooms = rooms;
        }
    }
}
