//! View Routes
//!
//! Prepared tables and chart descriptors, one endpoint per view.
//!
//! - GET /api/v1/views/national
//! - GET /api/v1/views/regional
//! - GET /api/v1/views/sector?year_a=&year_b=
//! - GET /api/v1/views/ranking?year=
//! - GET /api/v1/views/raw
//! - GET /api/v1/dashboard?ranking_year=&year_a=&year_b=

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{RankingParams, SectorParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::prepare::{RegionRank, RegionYearRatio, SectorEnrollment, YearTotals};
use crate::views::{Dashboard, DashboardViews, RawView, View, ViewSelection};

/// Build one view over the active dataset
async fn with_dashboard<T>(
    state: &AppState,
    build: impl FnOnce(&Dashboard<'_>) -> T,
) -> ApiResult<T> {
    let (_, dataset) = state.load_active().await?;
    let dashboard = Dashboard::new(&dataset, &state.regions, &state.sectors);
    Ok(build(&dashboard))
}

/// GET /api/v1/views/national
pub async fn national(State(state): State<Arc<AppState>>) -> ApiResult<Json<View<YearTotals>>> {
    with_dashboard(&state, |d| d.national()).await.map(Json)
}

/// GET /api/v1/views/regional
pub async fn regional(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<View<RegionYearRatio>>> {
    with_dashboard(&state, |d| d.regional()).await.map(Json)
}

/// GET /api/v1/views/sector
///
/// Missing years default to the earliest and latest years.
pub async fn sector(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SectorParams>, QueryRejection>,
) -> ApiResult<Json<View<SectorEnrollment>>> {
    let Query(params) = query?;
    let selection = ViewSelection {
        year_a: params.year_a,
        year_b: params.year_b,
        ..Default::default()
    };
    with_dashboard(&state, |d| d.sector(d.resolve(&selection).compare))
        .await
        .map(Json)
}

/// GET /api/v1/views/ranking
///
/// A missing year defaults to the latest year.
pub async fn ranking(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RankingParams>, QueryRejection>,
) -> ApiResult<Json<View<RegionRank>>> {
    let Query(params) = query?;
    let selection = ViewSelection {
        ranking_year: params.year,
        ..Default::default()
    };
    with_dashboard(&state, |d| d.ranking(d.resolve(&selection).ranking_year))
        .await
        .map(Json)
}

/// GET /api/v1/views/raw
pub async fn raw(State(state): State<Arc<AppState>>) -> ApiResult<Json<RawView>> {
    with_dashboard(&state, |d| d.raw()).await.map(Json)
}

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ViewSelection>, QueryRejection>,
) -> ApiResult<Json<DashboardViews>> {
    let Query(selection) = query?;
    with_dashboard(&state, |d| d.build(&selection)).await.map(Json)
}
