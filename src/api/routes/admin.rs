//! Administrative endpoints.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::{require_write_access, ApiError};

#[derive(Debug, Serialize)]
pub struct MigrateResponse {
    pub hotels: u32,
    pub performance_records: u32,
}

/// Ensure the data-directory layout exists and compact both stores,
/// rewriting them and dropping lines that no longer parse.
pub async fn migrate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MigrateResponse>, ApiError> {
    require_write_access(&state, &headers)?;

    state.storage.ensure_layout()?;
    let hotels = state.hotels.compact().await? as u32;
    let performance_records = state.performance.compact().await? as u32;

    info!(
        "Migration complete: {} hotels, {} performance records",
        hotels, performance_records
    );

    Ok(Json(MigrateResponse {
        hotels,
        performance_records,
    }))
}
