//! Hotel ranking engine.
//!
//! Ranks every hotel in the roster by a chosen metric, best first. Hotels
//! with no records score zero and sink to the bottom. The sort is stable,
//! so ties keep roster order and ranks are deterministic across requests.

use std::str::FromStr;

use serde::Serialize;

use super::{aggregate, AggregateTotals};
use crate::models::{Hotel, HotelId, PerformanceRecord};

/// Rank reported for a hotel that is not in the roster.
pub const UNRANKED: i64 = -1;

/// A hotel together with its full record history.
pub type RosterEntry = (Hotel, Vec<PerformanceRecord>);

/// Metric to rank hotels by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    RevPar,
    OccupancyRate,
    Adr,
}

impl Metric {
    /// Evaluate this metric over aggregate totals.
    pub fn of(&self, totals: &AggregateTotals) -> f64 {
        match self {
            Metric::RevPar => totals.rev_par(),
            Metric::OccupancyRate => totals.occupancy_rate(),
            Metric::Adr => totals.adr(),
        }
    }

    /// Stable name used in responses and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::RevPar => "revpar",
            Metric::OccupancyRate => "occupancy_rate",
            Metric::Adr => "adr",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revpar" => Ok(Metric::RevPar),
            "occupancy-rate" | "occupancy_rate" => Ok(Metric::OccupancyRate),
            "adr" => Ok(Metric::Adr),
            other => Err(format!(
                "unknown metric '{}' (expected revpar, occupancy-rate, or adr)",
                other
            )),
        }
    }
}

/// A hotel with its computed metric value.
#[derive(Debug, Clone, Serialize)]
pub struct RankedHotel {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub value: f64,
}

/// Rank all roster hotels by `metric`, best first.
///
/// Every roster hotel appears exactly once, including hotels with no
/// records (value 0 per the zero-denominator policy). Ties keep roster
/// order: the comparator only swaps strictly-greater values and
/// `sort_by` is stable.
pub fn rank_hotels(roster: &[RosterEntry], metric: Metric) -> Vec<RankedHotel> {
    let mut rankings: Vec<RankedHotel> = roster
        .iter()
        .map(|(hotel, records)| RankedHotel {
            hotel: hotel.clone(),
            value: metric.of(&aggregate(records)),
        })
        .collect();

    // Values cannot be NaN (zero-denominator inputs produce 0), so the
    // Equal fallback only ever applies to genuine ties.
    rankings.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    rankings
}

/// 1-based position of `hotel_id` in `rankings`, or [`UNRANKED`] when the
/// id is not present. "Not ranked" is a sentinel, not an error.
pub fn rank_of(rankings: &[RankedHotel], hotel_id: &HotelId) -> i64 {
    rankings
        .iter()
        .position(|entry| &entry.hotel.id == hotel_id)
        .map(|idx| idx as i64 + 1)
        .unwrap_or(UNRANKED)
}

/// Independent ranks for one hotel across all three metrics.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeRanking {
    pub rev_par_rank: i64,
    pub occupancy_rate_rank: i64,
    pub adr_rank: i64,
    pub pool_size: u32,
}

/// Rank `hotel_id` by each metric against the full roster.
///
/// Each sub-rank is computed independently; a hotel can lead one table
/// and trail another. An unknown id reports [`UNRANKED`] in every field.
pub fn composite_ranking(roster: &[RosterEntry], hotel_id: &HotelId) -> CompositeRanking {
    CompositeRanking {
        rev_par_rank: rank_of(&rank_hotels(roster, Metric::RevPar), hotel_id),
        occupancy_rate_rank: rank_of(&rank_hotels(roster, Metric::OccupancyRate), hotel_id),
        adr_rank: rank_of(&rank_hotels(roster, Metric::Adr), hotel_id),
        pool_size: roster.len() as u32,
    }
}
