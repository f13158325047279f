use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{require_write_access, ApiError, Pagination, PaginationMeta};
use crate::calculate::{average_daily_rate, revenue_per_available_room};
use crate::models::{HotelId, PerformanceId, PerformancePatch, PerformanceRecord};

#[derive(Debug, Deserialize)]
pub struct NewPerformanceRecord {
    pub hotel_id: String,
    pub available_rooms: u32,
    pub sold_rooms: u32,
    pub revenue: f64,
}

/// Body for the hotel-scoped create, where the hotel id comes from the
/// URL instead.
#[derive(Debug, Deserialize)]
pub struct NewHotelPerformanceRecord {
    pub available_rooms: u32,
    pub sold_rooms: u32,
    pub revenue: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecordListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub hotel_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub records: Vec<PerformanceRecord>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

/// A performance record with its per-record derived rates attached.
#[derive(Debug, Serialize)]
pub struct ComputedRecord {
    #[serde(flatten)]
    pub record: PerformanceRecord,
    pub adr: f64,
    pub rev_par: f64,
}

impl From<PerformanceRecord> for ComputedRecord {
    fn from(record: PerformanceRecord) -> Self {
        let adr = average_daily_rate(record.revenue, record.sold_rooms as u64);
        let rev_par = revenue_per_available_room(record.revenue, record.available_rooms as u64);
        Self {
            record,
            adr,
            rev_par,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u32,
}

pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewPerformanceRecord>,
) -> Result<Json<PerformanceRecord>, ApiError> {
    require_write_access(&state, &headers)?;

    let record = state
        .performance
        .create(PerformanceRecord::new(
            HotelId::from(body.hotel_id.as_str()),
            body.available_rooms,
            body.sold_rooms,
            body.revenue,
        ))
        .await?;
    Ok(Json(record))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<RecordListResponse>, ApiError> {
    let pagination = Pagination::new(params.page, params.page_size);

    let all = match &params.hotel_id {
        Some(hotel_id) => {
            state
                .performance
                .for_hotel(&HotelId::from(hotel_id.as_str()))
                .await?
        }
        None => state.performance.find_all().await?,
    };

    let total = all.len() as u32;
    let records: Vec<PerformanceRecord> = all
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.page_size as usize)
        .collect();

    Ok(Json(RecordListResponse {
        records,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn count_records(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.performance.count().await? as u32;
    Ok(Json(CountResponse { count }))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PerformanceRecord>, ApiError> {
    let record = state
        .performance
        .find_by_id(&PerformanceId::from(id.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("performance record {}", id)))?;
    Ok(Json(record))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<PerformancePatch>,
) -> Result<Json<PerformanceRecord>, ApiError> {
    require_write_access(&state, &headers)?;

    let record = state
        .performance
        .update(&PerformanceId::from(id.as_str()), &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("performance record {}", id)))?;
    Ok(Json(record))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_write_access(&state, &headers)?;

    let deleted = state
        .performance
        .delete(&PerformanceId::from(id.as_str()))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("performance record {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Records for one hotel, each with its own ADR and RevPAR attached.
/// An unknown hotel id matches nothing and returns an empty list.
pub async fn list_for_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ComputedRecord>>, ApiError> {
    let records = state
        .performance
        .for_hotel(&HotelId::from(id.as_str()))
        .await?;
    Ok(Json(records.into_iter().map(ComputedRecord::from).collect()))
}

/// Create a record attached to the hotel in the URL. Unlike the
/// top-level create this checks the hotel exists first.
pub async fn create_for_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<NewHotelPerformanceRecord>,
) -> Result<Json<PerformanceRecord>, ApiError> {
    require_write_access(&state, &headers)?;

    let hotel_id = HotelId::from(id.as_str());
    if state.hotels.find_by_id(&hotel_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("hotel {}", id)));
    }

    let record = state
        .performance
        .create(PerformanceRecord::new(
            hotel_id,
            body.available_rooms,
            body.sold_rooms,
            body.revenue,
        ))
        .await?;
    Ok(Json(record))
}

/// Delete every record for the hotel in the URL.
pub async fn delete_for_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    require_write_access(&state, &headers)?;

    let deleted = state
        .performance
        .delete_for_hotel(&HotelId::from(id.as_str()))
        .await? as u32;
    Ok(Json(BulkDeleteResponse { deleted }))
}
