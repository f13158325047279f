use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{require_write_access, ApiError, Pagination, PaginationMeta};
use crate::models::{Hotel, HotelId, HotelPatch};

#[derive(Debug, Deserialize)]
pub struct NewHotel {
    pub name: String,
    pub location: String,
    pub rooms: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HotelListResponse {
    pub hotels: Vec<Hotel>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

pub async fn create_hotel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewHotel>,
) -> Result<Json<Hotel>, ApiError> {
    require_write_access(&state, &headers)?;

    let hotel = state
        .hotels
        .create(Hotel::new(body.name, body.location, body.rooms))
        .await?;
    Ok(Json(hotel))
}

pub async fn list_hotels(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<HotelListResponse>, ApiError> {
    let pagination = Pagination::new(params.page, params.page_size);

    let all = state.hotels.find_all().await?;
    let total = all.len() as u32;
    let hotels: Vec<Hotel> = all
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.page_size as usize)
        .collect();

    Ok(Json(HotelListResponse {
        hotels,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn count_hotels(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.hotels.count().await? as u32;
    Ok(Json(CountResponse { count }))
}

pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = state
        .hotels
        .find_by_id(&HotelId::from(id.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("hotel {}", id)))?;
    Ok(Json(hotel))
}

pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<HotelPatch>,
) -> Result<Json<Hotel>, ApiError> {
    require_write_access(&state, &headers)?;

    let hotel = state
        .hotels
        .update(&HotelId::from(id.as_str()), &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("hotel {}", id)))?;
    Ok(Json(hotel))
}

pub async fn replace_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<NewHotel>,
) -> Result<Json<Hotel>, ApiError> {
    require_write_access(&state, &headers)?;

    let replacement = Hotel::new(body.name, body.location, body.rooms);
    let hotel = state
        .hotels
        .replace(&HotelId::from(id.as_str()), replacement)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("hotel {}", id)))?;
    Ok(Json(hotel))
}

/// Deleting a hotel also removes its performance records, so rankings
/// never see orphaned data.
pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_write_access(&state, &headers)?;

    let hotel_id = HotelId::from(id.as_str());
    let deleted = state.hotels.delete(&hotel_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("hotel {}", id)));
    }
    state.performance.delete_for_hotel(&hotel_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
