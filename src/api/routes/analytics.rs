//! Derived-metric and ranking endpoints.
//!
//! Everything here recomputes from a fresh roster on each request; there
//! is no cached derived state to invalidate.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::ranking::{
    composite_ranking, rank_hotels, rank_of, CompositeRanking, Metric, RankedHotel,
};
use crate::calculate::{aggregate, AggregateTotals};
use crate::models::HotelId;
use crate::storage::load_roster;

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub metric: &'static str,
    pub hotels: Vec<RankedHotel>,
}

async fn totals_for_hotel(state: &AppState, id: &str) -> Result<AggregateTotals, ApiError> {
    let records = state
        .performance
        .for_hotel(&HotelId::from(id))
        .await?;
    Ok(aggregate(&records))
}

/// ADR across the hotel's full history. A hotel with no records (or an
/// unknown id) reports 0, matching the zero-denominator policy.
pub async fn hotel_adr(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<f64>, ApiError> {
    Ok(Json(totals_for_hotel(&state, &id).await?.adr()))
}

/// RevPAR across the hotel's full history.
pub async fn hotel_rev_par(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<f64>, ApiError> {
    Ok(Json(totals_for_hotel(&state, &id).await?.rev_par()))
}

/// Occupancy rate across the hotel's full history.
pub async fn hotel_occupancy_rate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<f64>, ApiError> {
    Ok(Json(totals_for_hotel(&state, &id).await?.occupancy_rate()))
}

async fn rankings_by(state: &AppState, metric: Metric) -> Result<RankingsResponse, ApiError> {
    let roster = load_roster(&state.hotels, &state.performance).await?;
    Ok(RankingsResponse {
        metric: metric.as_str(),
        hotels: rank_hotels(&roster, metric),
    })
}

pub async fn rankings_by_rev_par(
    State(state): State<AppState>,
) -> Result<Json<RankingsResponse>, ApiError> {
    Ok(Json(rankings_by(&state, Metric::RevPar).await?))
}

pub async fn rankings_by_occupancy_rate(
    State(state): State<AppState>,
) -> Result<Json<RankingsResponse>, ApiError> {
    Ok(Json(rankings_by(&state, Metric::OccupancyRate).await?))
}

pub async fn rankings_by_adr(
    State(state): State<AppState>,
) -> Result<Json<RankingsResponse>, ApiError> {
    Ok(Json(rankings_by(&state, Metric::Adr).await?))
}

async fn rank_by(state: &AppState, id: &str, metric: Metric) -> Result<i64, ApiError> {
    let roster = load_roster(&state.hotels, &state.performance).await?;
    let rankings = rank_hotels(&roster, metric);
    Ok(rank_of(&rankings, &HotelId::from(id)))
}

/// 1-based RevPAR rank of one hotel, or -1 when it is not in the roster.
pub async fn rank_by_rev_par(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<i64>, ApiError> {
    Ok(Json(rank_by(&state, &id, Metric::RevPar).await?))
}

pub async fn rank_by_occupancy_rate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<i64>, ApiError> {
    Ok(Json(rank_by(&state, &id, Metric::OccupancyRate).await?))
}

pub async fn rank_by_adr(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<i64>, ApiError> {
    Ok(Json(rank_by(&state, &id, Metric::Adr).await?))
}

/// Composite rank report: all three sub-ranks plus pool size. The roster
/// is loaded once, so the sub-ranks are consistent within the response.
pub async fn hotel_rankings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompositeRanking>, ApiError> {
    let roster = load_roster(&state.hotels, &state.performance).await?;
    Ok(Json(composite_ranking(&roster, &HotelId::from(id.as_str()))))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::storage::StorageConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn test_state(dir: &std::path::Path) -> AppState {
        AppState::new(StorageConfig::new(dir.to_path_buf()), None)
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post_json(app: axum::Router, uri: &str, body: Value) -> Value {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed_hotel(
        state: &AppState,
        name: &str,
        records: &[(u32, u32, f64)],
    ) -> String {
        let hotel = post_json(
            build_router(state.clone()),
            "/api/hotels",
            json!({"name": name, "location": "Testville", "rooms": 100}),
        )
        .await;
        let id = hotel["id"].as_str().unwrap().to_string();

        for (available, sold, revenue) in records {
            post_json(
                build_router(state.clone()),
                &format!("/api/hotels/{}/performance-records", id),
                json!({
                    "available_rooms": available,
                    "sold_rooms": sold,
                    "revenue": revenue
                }),
            )
            .await;
        }
        id
    }

    #[tokio::test]
    async fn test_hotel_metric_endpoints() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        // Two records: totals are revenue 3000, sold 100, available 200.
        let id = seed_hotel(&state, "Metrics", &[(100, 60, 2000.0), (100, 40, 1000.0)]).await;

        let (status, adr) = get_json(
            build_router(state.clone()),
            &format!("/api/hotels/{}/adr", id),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(adr, json!(30.0));

        let (_, rev_par) = get_json(
            build_router(state.clone()),
            &format!("/api/hotels/{}/revpar", id),
        )
        .await;
        assert_eq!(rev_par, json!(15.0));

        let (_, occupancy) = get_json(
            build_router(state),
            &format!("/api/hotels/{}/occupancy-rate", id),
        )
        .await;
        assert_eq!(occupancy, json!(0.5));
    }

    #[tokio::test]
    async fn test_metrics_for_hotel_without_records() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let id = seed_hotel(&state, "Idle", &[]).await;

        for path in ["adr", "revpar", "occupancy-rate"] {
            let (status, value) = get_json(
                build_router(state.clone()),
                &format!("/api/hotels/{}/{}", id, path),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(value, json!(0.0));
        }
    }

    #[tokio::test]
    async fn test_rankings_sorted_descending() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        seed_hotel(&state, "Low", &[(100, 10, 500.0)]).await;
        seed_hotel(&state, "High", &[(100, 90, 9000.0)]).await;
        seed_hotel(&state, "Mid", &[(100, 50, 4000.0)]).await;

        let (status, body) = get_json(build_router(state), "/api/rankings/revpar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metric"], "revpar");

        let hotels = body["hotels"].as_array().unwrap();
        assert_eq!(hotels.len(), 3);
        assert_eq!(hotels[0]["name"], "High");
        assert_eq!(hotels[2]["name"], "Low");

        let values: Vec<f64> = hotels
            .iter()
            .map(|h| h["value"].as_f64().unwrap())
            .collect();
        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[tokio::test]
    async fn test_rankings_tie_break_is_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        // Identical ratios: ADR 20, RevPAR 10, occupancy 0.5 for both.
        seed_hotel(&state, "H1", &[(100, 50, 1000.0)]).await;
        seed_hotel(&state, "H2", &[(50, 25, 500.0)]).await;

        for uri in [
            "/api/rankings/revpar",
            "/api/rankings/occupancy-rate",
            "/api/rankings/adr",
        ] {
            let (_, body) = get_json(build_router(state.clone()), uri).await;
            let hotels = body["hotels"].as_array().unwrap();
            assert_eq!(hotels[0]["name"], "H1");
            assert_eq!(hotels[1]["name"], "H2");
        }
    }

    #[tokio::test]
    async fn test_hotel_without_records_ranks_last() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        seed_hotel(&state, "Busy", &[(100, 50, 1000.0)]).await;
        let empty_id = seed_hotel(&state, "Empty", &[]).await;

        let (_, body) = get_json(build_router(state.clone()), "/api/rankings/adr").await;
        let hotels = body["hotels"].as_array().unwrap();
        assert_eq!(hotels[1]["name"], "Empty");
        assert_eq!(hotels[1]["value"], 0.0);

        let (_, rank) = get_json(
            build_router(state),
            &format!("/api/hotels/{}/rank/adr", empty_id),
        )
        .await;
        assert_eq!(rank, json!(2));
    }

    #[tokio::test]
    async fn test_rank_endpoints() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let low = seed_hotel(&state, "Low", &[(100, 10, 500.0)]).await;
        let high = seed_hotel(&state, "High", &[(100, 90, 9000.0)]).await;

        let (_, rank) = get_json(
            build_router(state.clone()),
            &format!("/api/hotels/{}/rank/revpar", high),
        )
        .await;
        assert_eq!(rank, json!(1));

        let (_, rank) = get_json(
            build_router(state.clone()),
            &format!("/api/hotels/{}/rank/occupancy-rate", low),
        )
        .await;
        assert_eq!(rank, json!(2));

        // Unknown hotels are "not ranked", not an error.
        let (status, rank) = get_json(
            build_router(state),
            "/api/hotels/no-such-hotel/rank/adr",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rank, json!(-1));
    }

    #[tokio::test]
    async fn test_composite_rankings() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        // Boutique: best ADR and RevPAR, worst occupancy.
        let boutique = seed_hotel(&state, "Boutique", &[(100, 10, 5000.0)]).await;
        seed_hotel(&state, "Budget", &[(100, 100, 4000.0)]).await;

        let (status, body) = get_json(
            build_router(state),
            &format!("/api/hotels/{}/rankings", boutique),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adr_rank"], 1);
        assert_eq!(body["rev_par_rank"], 1);
        assert_eq!(body["occupancy_rate_rank"], 2);
        assert_eq!(body["pool_size"], 2);
    }

    #[tokio::test]
    async fn test_composite_rankings_unknown_hotel() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        seed_hotel(&state, "Only", &[(10, 5, 300.0)]).await;

        let (status, body) = get_json(
            build_router(state),
            "/api/hotels/no-such-hotel/rankings",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rev_par_rank"], -1);
        assert_eq!(body["occupancy_rate_rank"], -1);
        assert_eq!(body["adr_rank"], -1);
        assert_eq!(body["pool_size"], 1);
    }

    #[tokio::test]
    async fn test_rankings_empty_roster() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, body) = get_json(build_router(state), "/api/rankings/occupancy-rate").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["hotels"].as_array().unwrap().is_empty());
    }
}
